//! Inventory record: one flat table row per scanned item.

use serde::Serialize;

use crate::lookup::{Retailer, RetailerLinks};

/// Column order shared by every record sink.
pub const HEADER: [&str; 5] = [
    "Product Number",
    "Barcode",
    "Ferguson Link",
    "Home Depot Link",
    "Lowe's Link",
];

/// Barcode column when no symbol was decoded.
pub const NO_BARCODE: &str = "N/A";

/// Retailer column when the search found no matching link.
pub const LINK_NOT_FOUND: &str = "Not Found";

/// Retailer column when there was no product number to search for.
pub const NOT_SEARCHED: &str = "Not Searched";

/// An assembled inventory entry.
///
/// Fields are read-only once assembled; sinks only ever append records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecord {
    product_number: String,
    barcode: String,
    ferguson_link: String,
    home_depot_link: String,
    lowes_link: String,
}

impl InventoryRecord {
    /// Merge the pipeline outputs, replacing absent fields with placeholders.
    ///
    /// `links` is `None` when the resolver never ran. An absent product number
    /// is carried through as an empty string.
    pub fn assemble(
        barcode: Option<&str>,
        product_number: Option<&str>,
        links: Option<&RetailerLinks>,
    ) -> Self {
        let link = |retailer: Retailer| match links {
            Some(links) => links
                .get(retailer)
                .unwrap_or(LINK_NOT_FOUND)
                .to_string(),
            None => NOT_SEARCHED.to_string(),
        };

        Self {
            product_number: product_number.unwrap_or_default().to_string(),
            barcode: barcode.unwrap_or(NO_BARCODE).to_string(),
            ferguson_link: link(Retailer::Ferguson),
            home_depot_link: link(Retailer::HomeDepot),
            lowes_link: link(Retailer::Lowes),
        }
    }

    /// Rebuild a record from a stored row. Missing trailing cells become empty.
    pub fn from_row<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cells = cells.into_iter().map(|c| c.as_ref().to_string());
        let mut next = || cells.next().unwrap_or_default();

        Self {
            product_number: next(),
            barcode: next(),
            ferguson_link: next(),
            home_depot_link: next(),
            lowes_link: next(),
        }
    }

    /// Cells in [`HEADER`] order.
    pub fn as_row(&self) -> [&str; 5] {
        [
            self.product_number.as_str(),
            self.barcode.as_str(),
            self.ferguson_link.as_str(),
            self.home_depot_link.as_str(),
            self.lowes_link.as_str(),
        ]
    }

    pub fn product_number(&self) -> &str {
        &self.product_number
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    /// Stored link (or placeholder) for a retailer.
    pub fn link(&self, retailer: Retailer) -> &str {
        match retailer {
            Retailer::Ferguson => &self.ferguson_link,
            Retailer::HomeDepot => &self.home_depot_link,
            Retailer::Lowes => &self.lowes_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_assemble_fills_placeholders() {
        let links = RetailerLinks::default().with(Retailer::HomeDepot, Some("u2".to_string()));
        let record = InventoryRecord::assemble(None, None, Some(&links));

        assert_eq!(record.barcode(), "N/A");
        assert_eq!(record.product_number(), "");
        assert_eq!(record.link(Retailer::Ferguson), "Not Found");
        assert_eq!(record.link(Retailer::HomeDepot), "u2");
        assert_eq!(record.link(Retailer::Lowes), "Not Found");
    }

    #[test]
    fn test_assemble_without_search() {
        let record = InventoryRecord::assemble(Some("0123456789012"), None, None);

        assert_eq!(
            record.as_row(),
            ["", "0123456789012", "Not Searched", "Not Searched", "Not Searched"]
        );
    }

    #[test]
    fn test_row_order_matches_header() {
        let links = RetailerLinks::default()
            .with(Retailer::Ferguson, Some("f".to_string()))
            .with(Retailer::HomeDepot, Some("h".to_string()))
            .with(Retailer::Lowes, Some("l".to_string()));
        let record = InventoryRecord::assemble(Some("b"), Some("K-3999"), Some(&links));

        assert_eq!(record.as_row(), ["K-3999", "b", "f", "h", "l"]);
        assert_eq!(InventoryRecord::from_row(record.as_row()), record);
    }

    #[test]
    fn test_from_row_pads_short_rows() {
        let record = InventoryRecord::from_row(["K-1", "N/A"]);
        assert_eq!(record.as_row(), ["K-1", "N/A", "", "", ""]);
    }
}
