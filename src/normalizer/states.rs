//! Geographic boundary keys

/// Every state / union territory key of the India boundary dataset
/// (`properties.ST_NM`)
pub const INDIA_STATES: [&str; 36] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman & Nicobar Islands",
    "Chandigarh",
    "Dadra & Nagar Haveli & Daman & Diu",
    "Delhi",
    "Jammu & Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

/// Historical and alternate spellings, keyed by their formatted form
///
/// Keys are matched ignoring ASCII case because the connector "and" keeps
/// whatever case the input used.
pub(super) const STATE_ALIASES: [(&str, &str); 9] = [
    ("Nct Of Delhi", "Delhi"),
    ("Odissa", "Odisha"),
    ("Orissa", "Odisha"),
    ("Pondicherry", "Puducherry"),
    ("Jammu And Kashmir", "Jammu & Kashmir"),
    ("Dadra And Nagar Haveli And Daman And Diu", "Dadra & Nagar Haveli & Daman & Diu"),
    ("Andaman & Nicobar Islands", "Andaman & Nicobar Islands"),
    ("Andaman And Nicobar Islands", "Andaman & Nicobar Islands"),
    ("Uttaranchal", "Uttarakhand"),
];

/// Whether `name` is exactly a boundary dataset key
pub fn is_boundary_key(name: &str) -> bool {
    INDIA_STATES.contains(&name)
}
