use std::collections::HashMap;

/// Default shipping method column value for every report row.
pub const SHIPPING_DEFAULT: &str = "항공특송";
/// Default packaging column value for every report row.
pub const PACKAGE_DEFAULT: &str = "풀박스";

/// Processing outcome for a single product URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Pending,
    Success,
    Failure,
}

impl Outcome {
    /// Report cell text. Pending rows stay blank.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Pending => "",
            Outcome::Success => "성공",
            Outcome::Failure => "실패",
        }
    }
}

/// One report row, created with default values before its URL is processed
/// and mutated in place by the product processor.
#[derive(Debug, Clone)]
pub struct ResultRecord {
    pub outcome: Outcome,
    /// Spreadsheet hyperlink formula pointing back at the product page.
    pub product_ref: String,
    pub vendor: String,
    pub unit_price: String,
    pub thumbnail: String,
    pub market_price: String,
    pub gender: String,
    pub brand: String,
    pub first_category: String,
    pub second_category: String,
    pub kor_name: String,
    pub eng_name: String,
    pub model_number: String,
    pub colors: String,
    pub sizes: String,
    pub shipping: String,
    pub package_note: String,
}

impl ResultRecord {
    pub fn new(url: &str, vendor: &str, folder_name: &str) -> Self {
        ResultRecord {
            outcome: Outcome::Pending,
            product_ref: format!("=HYPERLINK(\"{url}\", \"{folder_name}\")"),
            vendor: vendor.to_string(),
            unit_price: String::new(),
            thumbnail: String::new(),
            market_price: String::new(),
            gender: String::new(),
            brand: String::new(),
            first_category: String::new(),
            second_category: String::new(),
            kor_name: String::new(),
            eng_name: String::new(),
            model_number: String::new(),
            colors: String::new(),
            sizes: String::new(),
            shipping: SHIPPING_DEFAULT.to_string(),
            package_note: PACKAGE_DEFAULT.to_string(),
        }
    }
}

/// Insertion-ordered collection of result records keyed by product URL.
///
/// Owned by the pipeline for the duration of a run; the report builder
/// reads it after all processing completes. One record per discovered URL,
/// never removed.
#[derive(Debug, Default)]
pub struct ResultStore {
    index: HashMap<String, usize>,
    records: Vec<ResultRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record for `url`. A URL already present keeps its
    /// existing record.
    pub fn insert(&mut self, url: &str, record: ResultRecord) {
        if self.index.contains_key(url) {
            return;
        }
        self.index.insert(url.to_string(), self.records.len());
        self.records.push(record);
    }

    pub fn record_for(&mut self, url: &str) -> Option<&mut ResultRecord> {
        let idx = *self.index.get(url)?;
        self.records.get_mut(idx)
    }

    pub fn get(&self, url: &str) -> Option<&ResultRecord> {
        let idx = *self.index.get(url)?;
        self.records.get(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ResultRecord> {
        self.records.iter_mut()
    }
}
