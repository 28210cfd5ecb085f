use serde::{Deserialize, Serialize};

use crate::domain::types::CustomerId;

/// Stages offered by the list filter.
pub const STAGE_FILTERS: [&str; 3] = ["Retomar Contacto", "Contacto Inicial-1", "Finalizado"];

/// Customer kinds offered by the list filter.
pub const KIND_FILTERS: [&str; 2] = ["Prospecto", "Frecuentes"];

/// Stage spellings that mark a customer as waiting for a follow-up call.
pub const PENDING_STAGES: [&str; 3] = ["Retomar Contacto", "Retomar", "retomar"];

macro_rules! customer_fields {
    ($($field:ident),+ $(,)?) => {
        /// Free-text attributes of a customer document.
        ///
        /// Every attribute is optional. The same shape doubles as a partial
        /// update where `None` means "leave the stored value alone".
        #[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
        pub struct CustomerFields {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )+
        }

        impl CustomerFields {
            /// Stored attribute names in display order.
            pub const NAMES: &'static [&'static str] = &[$(stringify!($field)),+];

            /// Present attributes as `(name, value)` pairs in display order.
            pub fn entries(&self) -> Vec<(&'static str, &str)> {
                let mut entries = Vec::new();
                $(
                    if let Some(value) = self.$field.as_deref() {
                        entries.push((stringify!($field), value));
                    }
                )+
                entries
            }

            /// Applies `f` to every present value and drops values left empty.
            pub fn map_values<F>(self, mut f: F) -> Self
            where
                F: FnMut(String) -> String,
            {
                Self {
                    $(
                        $field: self.$field.map(&mut f).filter(|v| !v.is_empty()),
                    )+
                }
            }

            /// Copies every attribute present in `changes` over `self`.
            pub fn merge(&mut self, changes: &CustomerFields) {
                $(
                    if let Some(value) = &changes.$field {
                        self.$field = Some(value.clone());
                    }
                )+
            }

            /// Returns `true` when no attribute is present.
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())+
            }
        }
    };
}

customer_fields!(
    nombre,
    apellidos,
    empresa,
    razon_social,
    rubro,
    tipo_cliente,
    medio_contacto,
    comentario,
    etapa,
    cargo,
    ruc,
    telefono,
    email,
    pagina_web,
    direccion,
    distrito,
    provincia,
    fecha,
);

impl CustomerFields {
    /// Trims every value and drops the ones left empty.
    #[must_use]
    pub fn normalized(self) -> Self {
        self.map_values(|value| value.trim().to_string())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(flatten)]
    pub fields: CustomerFields,
}

impl Customer {
    #[must_use]
    pub fn new(id: CustomerId, fields: CustomerFields) -> Self {
        Self { id, fields }
    }

    /// Ordering marker of this row within the `nombre` ascending order.
    #[must_use]
    pub fn cursor(&self) -> CustomerCursor {
        CustomerCursor {
            nombre: self.fields.nombre.clone().unwrap_or_default(),
            id: self.id.clone(),
        }
    }

    /// Name shown on cards and pickers, falling back to the store key.
    pub fn display_name(&self) -> &str {
        self.fields
            .nombre
            .as_deref()
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// Position of a row in the `(nombre, id)` ordering.
///
/// The id breaks ties between equal names so that a cursor always designates
/// exactly one row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerCursor {
    pub nombre: String,
    pub id: CustomerId,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCustomer {
    pub fields: CustomerFields,
}

impl NewCustomer {
    #[must_use]
    pub fn new(fields: CustomerFields) -> Self {
        Self {
            fields: fields.normalized(),
        }
    }
}

/// Partial update merged into a stored customer.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateCustomer {
    pub fields: CustomerFields,
}

impl UpdateCustomer {
    #[must_use]
    pub fn new(fields: CustomerFields) -> Self {
        Self {
            fields: fields.normalized(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
