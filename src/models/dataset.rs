use super::EnrichedProduct;

/// Ordered rows of one run. A row's index is its position, so indices are
/// always `0..len()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    rows: Vec<EnrichedProduct>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = EnrichedProduct>) {
        self.rows.extend(rows);
    }

    /// Drop every row without a positive energy value.
    pub fn retain_positive_kcal(&mut self) {
        self.rows.retain(|r| r.kcal_per100 > 0.0);
    }

    pub fn rows(&self) -> &[EnrichedProduct] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&EnrichedProduct> {
        self.rows.get(index)
    }

    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, &EnrichedProduct)> {
        self.rows.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<EnrichedProduct> {
        self.rows
    }
}

impl From<Vec<EnrichedProduct>> for Dataset {
    fn from(rows: Vec<EnrichedProduct>) -> Self {
        Self { rows }
    }
}

impl FromIterator<EnrichedProduct> for Dataset {
    fn from_iter<I: IntoIterator<Item = EnrichedProduct>>(iter: I) -> Self {
        Self { rows: iter.into_iter().collect() }
    }
}
