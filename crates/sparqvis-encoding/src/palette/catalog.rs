//! Built-in color schemes and interpolators.
//!
//! Categorical and sequential schemes are the ColorBrewer and d3 palettes.
//! Interpolators are piecewise-linear ramps through the listed stops.

use std::collections::HashMap;
use std::sync::LazyLock;

/// A fixed palette with one or more size variants.
#[derive(Debug)]
pub struct Scheme {
    /// Registry name.
    pub name: &'static str,
    /// Variants, shortest first.
    pub variants: &'static [&'static [&'static str]],
}

impl Scheme {
    /// The variant with exactly `len` colors, if any.
    pub fn variant(&self, len: usize) -> Option<&'static [&'static str]> {
        self.variants.iter().copied().find(|v| v.len() == len)
    }

    /// The variant with the most colors.
    pub fn longest(&self) -> &'static [&'static str] {
        self.variants
            .iter()
            .copied()
            .max_by_key(|v| v.len())
            .unwrap_or_default()
    }
}

/// A continuous `[0, 1]` color ramp.
#[derive(Debug)]
pub struct Interpolator {
    /// Registry name.
    pub name: &'static str,
    stops: Vec<[f64; 3]>,
}

impl Interpolator {
    fn new(name: &'static str, stops: &[&str]) -> Self {
        Self {
            name,
            stops: stops.iter().filter_map(|hex| parse_hex(hex)).collect(),
        }
    }

    /// Ramp through caller-supplied `#rrggbb` stops.
    ///
    /// Returns `None` unless there are at least two stops and all of them
    /// parse.
    pub fn from_stops(stops: &[String]) -> Option<Self> {
        let parsed: Vec<[f64; 3]> = stops
            .iter()
            .map(|hex| parse_hex(hex))
            .collect::<Option<_>>()?;
        (parsed.len() >= 2).then_some(Self {
            name: "custom",
            stops: parsed,
        })
    }

    /// Color at `t`, clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> String {
        let n = self.stops.len();
        match n {
            0 => return "#000000".to_string(),
            1 => return rgb_to_hex(self.stops[0]),
            _ => {}
        }

        let scaled = t.clamp(0.0, 1.0) * (n - 1) as f64;
        let lo = scaled.floor() as usize;
        let hi = scaled.ceil() as usize;
        if lo == hi {
            return rgb_to_hex(self.stops[lo]);
        }

        let f = scaled - lo as f64;
        let (c0, c1) = (self.stops[lo], self.stops[hi]);
        rgb_to_hex([
            c0[0] + (c1[0] - c0[0]) * f,
            c0[1] + (c1[1] - c0[1]) * f,
            c0[2] + (c1[2] - c0[2]) * f,
        ])
    }

    /// `count` evenly spaced colors from one end of the ramp to the other.
    ///
    /// A single sample is taken from the middle.
    pub fn sample(&self, count: usize) -> Vec<String> {
        match count {
            0 => Vec::new(),
            1 => vec![self.at(0.5)],
            _ => (0..count)
                .map(|i| self.at(i as f64 / (count - 1) as f64))
                .collect(),
        }
    }
}

/// Parse `#rrggbb` into unit RGB.
pub fn parse_hex(value: &str) -> Option<[f64; 3]> {
    let hex = value.trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .ok()
            .map(|v| v as f64 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn rgb_to_hex(rgb: [f64; 3]) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        (rgb[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb[2].clamp(0.0, 1.0) * 255.0).round() as u8
    )
}

// ============================================================================
// Registry
// ============================================================================

/// Lookup tables of every built-in palette.
#[derive(Debug)]
pub struct Registry {
    schemes: HashMap<&'static str, Scheme>,
    interpolators: HashMap<&'static str, Interpolator>,
}

impl Registry {
    /// Scheme registered under exactly `name`.
    pub fn scheme(&self, name: &str) -> Option<&Scheme> {
        self.schemes.get(name)
    }

    /// Interpolator registered under exactly `name`.
    pub fn interpolator(&self, name: &str) -> Option<&Interpolator> {
        self.interpolators.get(name)
    }

    /// Registered scheme names, sorted.
    pub fn scheme_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.schemes.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Registered interpolator names, sorted.
    pub fn interpolator_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.interpolators.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// The palette registry, built on first use.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    let schemes: HashMap<&'static str, Scheme> = SCHEMES
        .iter()
        .map(|&(name, variants)| (name, Scheme { name, variants }))
        .collect();
    let mut interpolators: HashMap<&'static str, Interpolator> = INTERPOLATORS
        .iter()
        .map(|&(name, stops)| (name, Interpolator::new(name, stops)))
        .collect();
    // Sequential schemes double as ramps through their longest variant
    for name in SEQUENTIAL {
        if let Some(scheme) = schemes.get(name) {
            interpolators.insert(name, Interpolator::new(name, scheme.longest()));
        }
    }
    Registry {
        schemes,
        interpolators,
    }
});

// ============================================================================
// Data
// ============================================================================

const CATEGORY10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];
const ACCENT: &[&str] = &[
    "#7fc97f", "#beaed4", "#fdc086", "#ffff99", "#386cb0", "#f0027f", "#bf5b17", "#666666",
];
const DARK2: &[&str] = &[
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];
const PAIRED: &[&str] = &[
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00",
    "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
];
const PASTEL1: &[&str] = &[
    "#fbb4ae", "#b3cde3", "#ccebc5", "#decbe4", "#fed9a6", "#ffffcc", "#e5d8bd", "#fddaec",
    "#f2f2f2",
];
const PASTEL2: &[&str] = &[
    "#b3e2cd", "#fdcdac", "#cbd5e8", "#f4cae4", "#e6f5c9", "#fff2ae", "#f1e2cc", "#cccccc",
];
const SET1: &[&str] = &[
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf",
    "#999999",
];
const SET2: &[&str] = &[
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];
const SET3: &[&str] = &[
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];
const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

const BLUES: &[&[&str]] = &[
    &["#deebf7", "#9ecae1", "#3182bd"],
    &["#eff3ff", "#bdd7e7", "#6baed6", "#2171b5"],
    &["#eff3ff", "#bdd7e7", "#6baed6", "#3182bd", "#08519c"],
    &["#eff3ff", "#c6dbef", "#9ecae1", "#6baed6", "#3182bd", "#08519c"],
    &["#eff3ff", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#084594"],
    &["#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#084594"],
    &[
        "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
        "#08306b",
    ],
];
const GREENS: &[&[&str]] = &[
    &["#e5f5e0", "#a1d99b", "#31a354"],
    &["#edf8e9", "#bae4b3", "#74c476", "#238b45"],
    &["#edf8e9", "#bae4b3", "#74c476", "#31a354", "#006d2c"],
    &["#edf8e9", "#c7e9c0", "#a1d99b", "#74c476", "#31a354", "#006d2c"],
    &["#edf8e9", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45", "#005a32"],
    &["#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45", "#005a32"],
    &[
        "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45", "#006d2c",
        "#00441b",
    ],
];
const GREYS: &[&[&str]] = &[
    &["#f0f0f0", "#bdbdbd", "#636363"],
    &["#f7f7f7", "#cccccc", "#969696", "#525252"],
    &["#f7f7f7", "#cccccc", "#969696", "#636363", "#252525"],
    &["#f7f7f7", "#d9d9d9", "#bdbdbd", "#969696", "#636363", "#252525"],
    &["#f7f7f7", "#d9d9d9", "#bdbdbd", "#969696", "#737373", "#525252", "#252525"],
    &["#ffffff", "#f0f0f0", "#d9d9d9", "#bdbdbd", "#969696", "#737373", "#525252", "#252525"],
    &[
        "#ffffff", "#f0f0f0", "#d9d9d9", "#bdbdbd", "#969696", "#737373", "#525252", "#252525",
        "#000000",
    ],
];
const ORANGES: &[&[&str]] = &[
    &["#fee6ce", "#fdae6b", "#e6550d"],
    &["#feedde", "#fdbe85", "#fd8d3c", "#d94701"],
    &["#feedde", "#fdbe85", "#fd8d3c", "#e6550d", "#a63603"],
    &["#feedde", "#fdd0a2", "#fdae6b", "#fd8d3c", "#e6550d", "#a63603"],
    &["#feedde", "#fdd0a2", "#fdae6b", "#fd8d3c", "#f16913", "#d94801", "#8c2d04"],
    &["#fff5eb", "#fee6ce", "#fdd0a2", "#fdae6b", "#fd8d3c", "#f16913", "#d94801", "#8c2d04"],
    &[
        "#fff5eb", "#fee6ce", "#fdd0a2", "#fdae6b", "#fd8d3c", "#f16913", "#d94801", "#a63603",
        "#7f2704",
    ],
];
const PURPLES: &[&[&str]] = &[
    &["#efedf5", "#bcbddc", "#756bb1"],
    &["#f2f0f7", "#cbc9e2", "#9e9ac8", "#6a51a3"],
    &["#f2f0f7", "#cbc9e2", "#9e9ac8", "#756bb1", "#54278f"],
    &["#f2f0f7", "#dadaeb", "#bcbddc", "#9e9ac8", "#756bb1", "#54278f"],
    &["#f2f0f7", "#dadaeb", "#bcbddc", "#9e9ac8", "#807dba", "#6a51a3", "#4a1486"],
    &["#fcfbfd", "#efedf5", "#dadaeb", "#bcbddc", "#9e9ac8", "#807dba", "#6a51a3", "#4a1486"],
    &[
        "#fcfbfd", "#efedf5", "#dadaeb", "#bcbddc", "#9e9ac8", "#807dba", "#6a51a3", "#54278f",
        "#3f007d",
    ],
];
const REDS: &[&[&str]] = &[
    &["#fee0d2", "#fc9272", "#de2d26"],
    &["#fee5d9", "#fcae91", "#fb6a4a", "#cb181d"],
    &["#fee5d9", "#fcae91", "#fb6a4a", "#de2d26", "#a50f15"],
    &["#fee5d9", "#fcbba1", "#fc9272", "#fb6a4a", "#de2d26", "#a50f15"],
    &["#fee5d9", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#99000d"],
    &["#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#99000d"],
    &[
        "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#a50f15",
        "#67000d",
    ],
];

const SCHEMES: &[(&str, &[&[&str]])] = &[
    ("Category10", &[CATEGORY10]),
    ("Accent", &[ACCENT]),
    ("Dark2", &[DARK2]),
    ("Paired", &[PAIRED]),
    ("Pastel1", &[PASTEL1]),
    ("Pastel2", &[PASTEL2]),
    ("Set1", &[SET1]),
    ("Set2", &[SET2]),
    ("Set3", &[SET3]),
    ("Tableau10", &[TABLEAU10]),
    ("Blues", BLUES),
    ("Greens", GREENS),
    ("Greys", GREYS),
    ("Oranges", ORANGES),
    ("Purples", PURPLES),
    ("Reds", REDS),
];

const SEQUENTIAL: [&str; 6] = ["Blues", "Greens", "Greys", "Oranges", "Purples", "Reds"];

const INTERPOLATORS: &[(&str, &[&str])] = &[
    (
        "Viridis",
        &[
            "#440154", "#482475", "#414487", "#355f8d", "#2a788e", "#21918c", "#22a884",
            "#44bf70", "#7ad151", "#bddf26", "#fde725",
        ],
    ),
    (
        "Inferno",
        &[
            "#000004", "#160b39", "#420a68", "#6a176e", "#932667", "#bc3754", "#dd513a",
            "#f37819", "#fca50a", "#f6d746", "#fcffa4",
        ],
    ),
    (
        "Magma",
        &[
            "#000004", "#140e36", "#3b0f70", "#641a80", "#8c2981", "#b73779", "#de4968",
            "#f7705c", "#fe9f6d", "#fecf92", "#fcfdbf",
        ],
    ),
    (
        "Plasma",
        &[
            "#0d0887", "#41049d", "#6a00a8", "#8f0da4", "#b12a90", "#cc4778", "#e16462",
            "#f2844b", "#fca636", "#fcce25", "#f0f921",
        ],
    ),
    (
        "Cividis",
        &[
            "#00224e", "#123570", "#3b496c", "#575d6d", "#707173", "#8a8678", "#a59c74",
            "#c3b369", "#e1cc55", "#fee838",
        ],
    ),
    (
        "Turbo",
        &[
            "#23171b", "#4a58dd", "#2f9df5", "#27d7c4", "#4df884", "#95fb51", "#dedd32",
            "#ffa423", "#f65f18", "#ba2208", "#900c00",
        ],
    ),
    (
        "RdBu",
        &[
            "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0",
            "#92c5de", "#4393c3", "#2166ac", "#053061",
        ],
    ),
    (
        "Spectral",
        &[
            "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#e6f598",
            "#abdda4", "#66c2a5", "#3288bd", "#5e4fa2",
        ],
    ),
];
