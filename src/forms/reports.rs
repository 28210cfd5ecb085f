use serde::Deserialize;

use crate::domain::types::CustomerId;
use crate::forms::FormError;

/// Customers ticked on the report builder, one `customer_ids` entry per checkbox.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateReportForm {
    #[serde(default)]
    pub customer_ids: Vec<String>,
}

impl GenerateReportForm {
    /// Parses a urlencoded body with repeated keys.
    pub fn from_bytes(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|e| FormError::Payload(e.to_string()))
    }

    /// Selected ids in submission order, duplicates removed.
    pub fn customer_ids(&self) -> Result<Vec<CustomerId>, FormError> {
        let mut ids: Vec<CustomerId> = Vec::with_capacity(self.customer_ids.len());
        for raw in &self.customer_ids {
            let id = CustomerId::new(raw.as_str()).map_err(|_| FormError::InvalidCustomerId)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_collect_into_a_list() {
        let form = GenerateReportForm::from_bytes(b"customer_ids=a&customer_ids=b&customer_ids=a")
            .unwrap();
        let ids: Vec<_> = form
            .customer_ids()
            .unwrap()
            .into_iter()
            .map(CustomerId::into_inner)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn empty_body_is_an_empty_selection() {
        let form = GenerateReportForm::from_bytes(b"").unwrap();
        assert!(form.customer_ids().unwrap().is_empty());
    }

    #[test]
    fn blank_id_is_rejected() {
        let form = GenerateReportForm::from_bytes(b"customer_ids=+").unwrap();
        assert!(matches!(
            form.customer_ids(),
            Err(FormError::InvalidCustomerId)
        ));
    }
}
