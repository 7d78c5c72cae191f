// chemistry module
pub mod chemistry {
    pub mod constants;
}

// data module
pub mod data {
    pub mod pattern;
}

// algorithm module
pub mod algorithm {
    pub mod isotope;
    pub mod similarity;
}

pub mod error;
