use serde::Deserialize;

/// Field set parsed from the model's JSON answer for one product page.
///
/// Transient: consumed into a `ResultRecord` right after extraction. Any
/// missing or mistyped field fails deserialization, which counts as an
/// extraction failure for that product.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractedFields {
    pub price: i64,
    pub market_price: String,
    pub brand: String,
    pub first_category: String,
    pub second_category: String,
    pub gender: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub kor_name: String,
    pub eng_name: String,
    pub genuine_number: String,
}

impl ExtractedFields {
    pub fn joined_colors(&self) -> String {
        self.colors.join(",")
    }

    /// Sizes joined with commas; parentheses become brackets so size
    /// annotations survive downstream option parsing.
    pub fn joined_sizes(&self) -> String {
        self.sizes.join(",").replace('(', "[").replace(')', "]")
    }
}
