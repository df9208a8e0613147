//! The fixed 20-colour palette used for chart colours and row segments.

pub const PALETTE: [&str; 20] = [
    "#ffbb78", "#ff9896", "#ff7f0e", "#f7b6d2", "#e377c2", "#dbdb8d", "#d62728", "#c7c7c7",
    "#c5b0d5", "#c49c94", "#bcbd22", "#aec7e8", "#9edae5", "#98df8a", "#9467bd", "#8c564b",
    "#7f7f7f", "#2ca02c", "#1f77b4", "#17becf",
];

/// Keeps `configured` and fills up to `count` entries with palette colours
/// picked by segment index.
pub fn fill_colors(configured: &[String], count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match configured.get(i) {
            Some(color) => color.clone(),
            None => PALETTE[i % PALETTE.len()].to_string(),
        })
        .collect()
}

/// `count` palette colours drawn with replacement. The same seed always
/// gives the same colours.
pub fn shuffled_colors(count: usize, seed: u64) -> Vec<String> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            let idx = (splitmix64(&mut state) % PALETTE.len() as u64) as usize;
            PALETTE[idx].to_string()
        })
        .collect()
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Maps single-letter colour codes found in older documents to names an
/// SVG renderer understands. Anything else passes through.
pub fn css_color(color: &str) -> &str {
    match color {
        "b" => "blue",
        "g" => "green",
        "r" => "red",
        "c" => "cyan",
        "m" => "magenta",
        "y" => "yellow",
        "k" => "black",
        "w" => "white",
        other => other,
    }
}
