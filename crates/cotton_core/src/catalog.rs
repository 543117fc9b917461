//! Fixed disease knowledge base shared with the remote classifier.
//!
//! The label set is a closed enumeration agreed with the inference endpoint.
//! Labels the classifier returns that are not listed here are surfaced as an
//! unrecognized result by the presenter.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiseaseCatalogEntry {
    pub label: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub recommendations: &'static [&'static str],
}

const CATALOG: [DiseaseCatalogEntry; 8] = [
    DiseaseCatalogEntry {
        label: "Aphids",
        name: "Aphids",
        description: "Small sap-sucking insects causing yellowing and distortion of leaves.",
        recommendations: &[
            "Spray neem oil or insecticidal soap.",
            "Introduce natural predators like ladybugs.",
            "Remove heavily infested leaves.",
            "Avoid excessive use of nitrogen-based fertilizers.",
        ],
    },
    DiseaseCatalogEntry {
        label: "army_worm",
        name: "Army Worm",
        description: "Caterpillars feeding on leaves, causing defoliation and crop damage.",
        recommendations: &[
            "Use Bacillus thuringiensis (Bt) sprays.",
            "Apply appropriate insecticides.",
            "Implement crop rotation to break the pest cycle.",
            "Regularly monitor fields for egg masses and larvae.",
        ],
    },
    DiseaseCatalogEntry {
        label: "bacterial_blight",
        name: "Bacterial Blight",
        description: "Angular leaf spots with dark brown margins.",
        recommendations: &[
            "Apply copper-based bactericides.",
            "Improve air circulation between plants.",
            "Remove infected plant debris.",
            "Use disease-resistant varieties for future planting.",
        ],
    },
    DiseaseCatalogEntry {
        label: "cotton_boll_rot",
        name: "Cotton Boll Rot",
        description: "Reddish-brown lesions on bolls leading to rotting.",
        recommendations: &[
            "Improve field drainage to avoid waterlogging.",
            "Apply appropriate fungicides.",
            "Remove and destroy infected bolls.",
            "Avoid overhead irrigation during wet conditions.",
        ],
    },
    DiseaseCatalogEntry {
        label: "green_cotton_boll",
        name: "Green Cotton Boll",
        description: "Underdeveloped cotton bolls with discoloration.",
        recommendations: &[
            "Maintain proper fertilization schedules.",
            "Control pest populations using integrated pest management (IPM).",
            "Avoid water stress during boll development.",
            "Ensure timely harvesting to prevent damage.",
        ],
    },
    DiseaseCatalogEntry {
        label: "powdery_mildew",
        name: "Powdery Mildew",
        description: "White powdery fungal growth on leaves and stems.",
        recommendations: &[
            "Apply sulfur-based fungicides.",
            "Ensure proper air circulation in the field.",
            "Avoid overhead irrigation to reduce humidity.",
            "Plant resistant varieties if available.",
        ],
    },
    DiseaseCatalogEntry {
        label: "target_spot",
        name: "Target Spot",
        description: "Circular lesions with concentric rings.",
        recommendations: &[
            "Apply fungicides at early stages.",
            "Improve drainage in the field.",
            "Maintain proper plant spacing.",
            "Remove affected leaves.",
        ],
    },
    DiseaseCatalogEntry {
        label: "healthy",
        name: "Healthy",
        description: "No disease detected.",
        recommendations: &[
            "Continue regular monitoring.",
            "Maintain current agricultural practices.",
            "Follow preventive measures.",
            "Schedule routine inspections.",
        ],
    },
];

/// Exact, case-sensitive lookup by classifier label.
pub fn lookup(label: &str) -> Option<&'static DiseaseCatalogEntry> {
    CATALOG.iter().find(|entry| entry.label == label)
}
