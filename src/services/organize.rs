//! Tech-stack grouping of detected languages and topics
//!
//! Items are matched case-insensitively (ignoring `-`, `_`, `.` and spaces)
//! against a static table; the first bucket listing an item wins and the
//! table's display name is stored. Items matching nothing are dropped.

use crate::types::{TechCategory, TechStack};

/// Deployment platform every organized stack carries
pub const PAGES_PLATFORM: &str = "GitHub Pages";

/// Bucket membership by display name, checked in this order
pub const TECH_KEYWORDS: &[(TechCategory, &[&str])] = &[
    (
        TechCategory::Core,
        &[
            "JavaScript", "TypeScript", "HTML", "Python", "Rust", "Go", "Java", "C", "C++", "C#",
            "Shell", "PHP", "Ruby", "Kotlin", "Swift", "WebAssembly",
        ],
    ),
    (
        TechCategory::Mapping,
        &[
            "MapLibre", "Leaflet", "OpenLayers", "Mapbox", "Cesium", "Turf", "GeoJSON", "GIS",
            "QGIS", "ArcGIS", "OpenStreetMap", "Geospatial", "Protomaps", "PMTiles",
        ],
    ),
    (
        TechCategory::Visualization,
        &[
            "D3", "Chart.js", "Three.js", "Plotly", "deck.gl", "ECharts", "Vega", "Highcharts",
            "Observable", "Visualization",
        ],
    ),
    (
        TechCategory::Frameworks,
        &[
            "React", "Next.js", "Vue", "Svelte", "Angular", "Astro", "Node.js", "Express",
            "Flask", "Django", "FastAPI", "Vite",
        ],
    ),
    (
        TechCategory::Styling,
        &["CSS", "SCSS", "Sass", "Less", "Tailwind CSS", "Bootstrap", "Styled Components"],
    ),
    (
        TechCategory::DataProcessing,
        &[
            "Pandas", "NumPy", "GeoPandas", "GDAL", "Shapely", "PostGIS", "PostgreSQL", "SQL",
            "DuckDB", "R", "Jupyter Notebook",
        ],
    ),
    (
        TechCategory::Deployment,
        &["GitHub Pages", "GitHub Actions", "Vercel", "Netlify", "Docker", "Cloudflare"],
    ),
];

/// Alternate spellings mapped to a display name in `TECH_KEYWORDS`
pub const TECH_ALIASES: &[(&str, &str)] = &[
    ("d3js", "D3"),
    ("chartjs", "Chart.js"),
    ("tailwind", "Tailwind CSS"),
    ("maplibregl", "MapLibre"),
    ("mapboxgl", "Mapbox"),
    ("openstreetmaps", "OpenStreetMap"),
    ("osm", "OpenStreetMap"),
    ("node", "Node.js"),
    ("reactjs", "React"),
    ("vuejs", "Vue"),
    ("ghpages", "GitHub Pages"),
    ("postgres", "PostgreSQL"),
    ("jupyter", "Jupyter Notebook"),
    ("wasm", "WebAssembly"),
];

/// Group languages and topics into the seven buckets
pub fn organize(languages: &[String], topics: &[String]) -> TechStack {
    let mut stack = TechStack::new();

    for item in languages.iter().chain(topics) {
        if let Some((category, display)) = lookup(item) {
            stack.insert(category, display);
        }
    }

    stack.insert(TechCategory::Deployment, PAGES_PLATFORM);
    stack
}

/// Bucket and display name for one language or topic
pub fn lookup(item: &str) -> Option<(TechCategory, &'static str)> {
    let key = normalize(item);
    if key.is_empty() {
        return None;
    }

    let key = TECH_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key, |(_, display)| normalize(display));

    TECH_KEYWORDS.iter().find_map(|(category, names)| {
        names
            .iter()
            .find(|name| normalize(name) == key)
            .map(|name| (*category, *name))
    })
}

fn normalize(item: &str) -> String {
    item.chars()
        .filter(|c| !matches!(c, '-' | '_' | '.' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
