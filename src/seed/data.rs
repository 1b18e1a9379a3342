/// Pairings resolved by `GET /` and by cache warm-up.
pub const DEMO_PAIRS: &[(&str, &str)] = &[
    ("H", "O"),
    ("Na", "Cl"),
    ("C", "O"),
    ("Fe", "O"),
    ("Si", "O"),
    ("N", "H"),
];

/// Elements a new board starts with.
pub const STARTER_ELEMENTS: &[&str] = &[
    "H2", "He", "Li", "B", "C", "N2", "O2", "F2", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl2",
    "Ar", "K", "Ca", "Ti", "Cr", "Mn", "Fe", "Ni", "Cu", "Zn", "Br2", "Ag", "I2", "Au", "Pb",
];
