/// Edge colors used when no palette is configured: the matplotlib Tableau
/// colors, a few color-hex.com palettes, then the CSS named colors.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#56ba5a", "#0cc6b8", "#fdc0c7", "#8b9df2", "#0e8523", "#2b92eb",
    "#0911e0", "#7a00f9", "#b47ef4", "#960735", "#f8102a", "#ff9807", "#fff84c", "#75f708",
    "#986f42", "#50473f", "#554b50", "#423a28", "#8b7340", "#00FFFF", "#7FFFD4", "#000000",
    "#0000FF", "#8A2BE2", "#A52A2A", "#DEB887", "#5F9EA0", "#7FFF00", "#D2691E", "#FF7F50",
    "#6495ED", "#DC143C", "#00FFFF", "#00008B", "#008B8B", "#B8860B", "#A9A9A9", "#006400",
    "#A9A9A9", "#BDB76B", "#8B008B", "#556B2F", "#FF8C00", "#9932CC", "#8B0000", "#E9967A",
    "#8FBC8F", "#483D8B", "#2F4F4F", "#2F4F4F", "#00CED1", "#9400D3", "#FF1493", "#00BFFF",
    "#696969", "#696969", "#1E90FF", "#B22222", "#228B22", "#FF00FF", "#FFD700", "#DAA520",
    "#808080", "#008000", "#ADFF2F", "#808080", "#FF69B4", "#CD5C5C", "#4B0082", "#F0E68C",
    "#7CFC00", "#ADD8E6", "#F08080", "#90EE90", "#FFB6C1", "#FFA07A", "#20B2AA", "#87CEFA",
    "#778899", "#00FF00", "#32CD32", "#FF00FF", "#800000", "#66CDAA", "#0000CD", "#BA55D3",
    "#9370DB", "#3CB371", "#7B68EE", "#00FA9A", "#48D1CC", "#C71585", "#191970", "#FFE4B5",
    "#FFDEAD", "#000080", "#808000", "#6B8E23", "#FFA500", "#FF4500", "#DA70D6", "#EEE8AA",
    "#98FB98", "#AFEEEE", "#DB7093", "#FFDAB9", "#CD853F", "#FFC0CB", "#DDA0DD", "#800080",
    "#663399", "#FF0000", "#BC8F8F", "#4169E1", "#8B4513", "#FA8072", "#F4A460", "#2E8B57",
    "#A0522D", "#C0C0C0", "#87CEEB", "#6A5ACD", "#708090", "#00FF7F", "#4682B4", "#D2B48C",
    "#008080", "#D8BFD8", "#FF6347", "#40E0D0", "#EE82EE", "#FFFF00", "#9ACD32",
];

pub fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

/// Cyclic cursor over a non-empty palette.
#[derive(Debug, Clone)]
pub struct ColorCycle<'a> {
    colors: &'a [String],
    cursor: usize,
}

impl<'a> ColorCycle<'a> {
    /// Returns `None` for an empty palette.
    pub fn new(colors: &'a [String]) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Self { colors, cursor: 0 })
        }
    }

    /// Take the color under the cursor, wrapping to the start once exhausted.
    pub fn next_color(&mut self) -> &'a str {
        let color = &self.colors[self.cursor];
        self.cursor = (self.cursor + 1) % self.colors.len();
        color
    }
}
