use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;

/// Customer awaiting a follow-up, as listed by the pending widget.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingCustomer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empresa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
}

impl From<Customer> for PendingCustomer {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.into_inner(),
            nombre: customer.fields.nombre,
            empresa: customer.fields.empresa,
            telefono: customer.fields.telefono,
        }
    }
}

/// One bar of the overview chart.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChartSeries {
    pub label: &'static str,
    pub value: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StatsWidget {
    pub total: usize,
    pub series: Vec<ChartSeries>,
}
