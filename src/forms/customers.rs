use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidateUrl, ValidationError};

use crate::domain::customer::{CustomerFields, NewCustomer, UpdateCustomer};
use crate::forms::FormError;
use crate::pagination::Direction;
use crate::views::customer_list::CustomerFilters;

fn validate_optional_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.trim().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.trim().validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("url"))
    }
}

/// Customer attributes posted by the add and edit dialogs.
///
/// Blank inputs are treated as absent. On edit that means "keep the stored value".
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CustomerForm {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub apellidos: Option<String>,
    #[serde(default)]
    pub empresa: Option<String>,
    #[serde(default)]
    pub razon_social: Option<String>,
    #[serde(default)]
    pub rubro: Option<String>,
    #[serde(default)]
    pub tipo_cliente: Option<String>,
    #[serde(default)]
    pub medio_contacto: Option<String>,
    #[serde(default)]
    pub comentario: Option<String>,
    #[serde(default)]
    pub etapa: Option<String>,
    #[serde(default)]
    pub cargo: Option<String>,
    #[serde(default)]
    pub ruc: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_optional_email"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_optional_url"))]
    pub pagina_web: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub distrito: Option<String>,
    #[serde(default)]
    pub provincia: Option<String>,
    #[serde(default)]
    pub fecha: Option<String>,
}

impl CustomerForm {
    /// Sanitized attributes with blank values dropped.
    fn into_fields(self) -> CustomerFields {
        CustomerFields {
            nombre: self.nombre,
            apellidos: self.apellidos,
            empresa: self.empresa,
            razon_social: self.razon_social,
            rubro: self.rubro,
            tipo_cliente: self.tipo_cliente,
            medio_contacto: self.medio_contacto,
            comentario: self.comentario,
            etapa: self.etapa,
            cargo: self.cargo,
            ruc: self.ruc,
            telefono: self.telefono,
            email: self.email,
            pagina_web: self.pagina_web,
            direccion: self.direccion,
            distrito: self.distrito,
            provincia: self.provincia,
            fecha: self.fecha,
        }
        .map_values(|value| ammonia::clean(value.trim()))
        .normalized()
    }

    pub fn into_new_customer(self) -> Result<NewCustomer, FormError> {
        self.validate()?;
        let fields = self.into_fields();
        if fields.nombre.is_none() {
            return Err(FormError::MissingName);
        }
        Ok(NewCustomer::new(fields))
    }

    pub fn into_update(self) -> Result<UpdateCustomer, FormError> {
        self.validate()?;
        Ok(UpdateCustomer::new(self.into_fields()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteCustomerForm {
    /// Set by the confirmation dialog.
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Deserialize)]
pub struct PageForm {
    pub direction: Direction,
}

#[derive(Debug, Default, Deserialize)]
pub struct FiltersForm {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub kind: String,
}

impl From<FiltersForm> for CustomerFilters {
    fn from(form: FiltersForm) -> Self {
        Self {
            search: form.search.trim().to_string(),
            stage: form.stage.trim().to_string(),
            kind: form.kind.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: serde::de::DeserializeOwned>(body: &str) -> T {
        serde_html_form::from_str(body).unwrap()
    }

    #[test]
    fn blank_inputs_are_absent_and_markup_is_stripped() {
        let form: CustomerForm =
            parse("nombre=+Ana+&empresa=%3Cscript%3Ex%3C%2Fscript%3EAcme&etapa=&email=");
        let new_customer = form.into_new_customer().unwrap();
        assert_eq!(new_customer.fields.nombre.as_deref(), Some("Ana"));
        assert_eq!(new_customer.fields.empresa.as_deref(), Some("Acme"));
        assert_eq!(new_customer.fields.etapa, None);
        assert_eq!(new_customer.fields.email, None);
    }

    #[test]
    fn create_requires_a_name() {
        let form: CustomerForm = parse("nombre=&empresa=Acme");
        assert!(matches!(
            form.into_new_customer(),
            Err(FormError::MissingName)
        ));
    }

    #[test]
    fn malformed_email_or_url_is_rejected() {
        let form: CustomerForm = parse("nombre=Ana&email=nope");
        assert!(matches!(form.into_update(), Err(FormError::Validation(_))));

        let form: CustomerForm = parse("pagina_web=not+a+url");
        assert!(matches!(form.into_update(), Err(FormError::Validation(_))));

        let form: CustomerForm = parse("email=ana%40acme.pe&pagina_web=https%3A%2F%2Facme.pe");
        assert!(form.into_update().is_ok());
    }

    #[test]
    fn update_keeps_only_present_fields() {
        let form: CustomerForm = parse("etapa=Finalizado&nombre=");
        let update = form.into_update().unwrap();
        assert_eq!(update.fields.etapa.as_deref(), Some("Finalizado"));
        assert_eq!(update.fields.nombre, None);
    }

    #[test]
    fn delete_defaults_to_unconfirmed() {
        let form: DeleteCustomerForm = parse("");
        assert!(!form.confirmed);
        let form: DeleteCustomerForm = parse("confirmed=true");
        assert!(form.confirmed);
    }

    #[test]
    fn page_and_filter_forms() {
        let form: PageForm = parse("direction=prev");
        assert_eq!(form.direction, Direction::Prev);

        let filters: CustomerFilters =
            parse::<FiltersForm>("search=+acme+&stage=Finalizado").into();
        assert_eq!(filters.search, "acme");
        assert_eq!(filters.stage, "Finalizado");
        assert!(filters.kind.is_empty());
    }
}
