use mapline::vlq::VlqEncoder;

pub const COMPILED_URL: &str = "https://example.com/dist/bundle.min.js";
pub const MAP_URL: &str = "https://example.com/dist/bundle.min.js.map";

/// Builds a minified-looking map: few long lines, many records per line.
pub fn synthetic_map(lines: u32, records_per_line: u32, sources: u32) -> Vec<u8> {
    let mut mappings = Vec::new();
    let mut seed = 0x2545_f491_4f6c_dd1du64;
    let mut next = move |bound: u32| {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed % u64::from(bound)) as u32
    };

    let (mut source, mut source_line, mut source_col, mut name) = (0u32, 0u32, 0u32, 0u32);
    for line in 0..lines {
        if line > 0 {
            mappings.push(b';');
        }
        let mut col = 0;
        for record in 0..records_per_line {
            if record > 0 {
                mappings.push(b',');
            }
            let mut encoder = VlqEncoder::new(&mut mappings);
            let next_col = col + 1 + next(12);
            encoder.encode_delta(col, next_col).unwrap();
            col = next_col;

            let next_source = next(sources);
            let next_line = source_line.saturating_add(next(3)).saturating_sub(next(2));
            let next_source_col = next(120);
            encoder.encode_delta(source, next_source).unwrap();
            encoder.encode_delta(source_line, next_line).unwrap();
            encoder.encode_delta(source_col, next_source_col).unwrap();
            (source, source_line, source_col) = (next_source, next_line, next_source_col);

            if record % 4 == 0 {
                let next_name = next(64);
                encoder.encode_delta(name, next_name).unwrap();
                name = next_name;
            }
        }
    }

    let sources = (0..sources)
        .map(|idx| format!("\"src/module_{idx}.ts\""))
        .collect::<Vec<_>>()
        .join(",");
    let names = (0..64)
        .map(|idx| format!("\"name{idx}\""))
        .collect::<Vec<_>>()
        .join(",");
    let mappings = String::from_utf8(mappings).unwrap();
    format!(
        r#"{{"version":3,"file":"bundle.min.js","sources":[{sources}],"names":[{names}],"mappings":"{mappings}"}}"#
    )
    .into_bytes()
}
