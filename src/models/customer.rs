use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, CustomerFields, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};
use crate::domain::types::{CustomerId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clientes)]
/// Diesel model for [`crate::domain::customer::Customer`].
pub struct Customer {
    pub id: String,
    pub nombre: String,
    pub apellidos: Option<String>,
    pub empresa: Option<String>,
    pub razon_social: Option<String>,
    pub rubro: Option<String>,
    pub tipo_cliente: Option<String>,
    pub medio_contacto: Option<String>,
    pub comentario: Option<String>,
    pub etapa: Option<String>,
    pub cargo: Option<String>,
    pub ruc: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub pagina_web: Option<String>,
    pub direccion: Option<String>,
    pub distrito: Option<String>,
    pub provincia: Option<String>,
    pub fecha: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clientes)]
/// Insertable form of [`Customer`].
pub struct NewCustomer<'a> {
    pub id: &'a str,
    pub nombre: &'a str,
    pub apellidos: Option<&'a str>,
    pub empresa: Option<&'a str>,
    pub razon_social: Option<&'a str>,
    pub rubro: Option<&'a str>,
    pub tipo_cliente: Option<&'a str>,
    pub medio_contacto: Option<&'a str>,
    pub comentario: Option<&'a str>,
    pub etapa: Option<&'a str>,
    pub cargo: Option<&'a str>,
    pub ruc: Option<&'a str>,
    pub telefono: Option<&'a str>,
    pub email: Option<&'a str>,
    pub pagina_web: Option<&'a str>,
    pub direccion: Option<&'a str>,
    pub distrito: Option<&'a str>,
    pub provincia: Option<&'a str>,
    pub fecha: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clientes)]
/// Partial changeset: `None` columns are left out of the `UPDATE`.
pub struct UpdateCustomer<'a> {
    pub nombre: Option<&'a str>,
    pub apellidos: Option<&'a str>,
    pub empresa: Option<&'a str>,
    pub razon_social: Option<&'a str>,
    pub rubro: Option<&'a str>,
    pub tipo_cliente: Option<&'a str>,
    pub medio_contacto: Option<&'a str>,
    pub comentario: Option<&'a str>,
    pub etapa: Option<&'a str>,
    pub cargo: Option<&'a str>,
    pub ruc: Option<&'a str>,
    pub telefono: Option<&'a str>,
    pub email: Option<&'a str>,
    pub pagina_web: Option<&'a str>,
    pub direccion: Option<&'a str>,
    pub distrito: Option<&'a str>,
    pub provincia: Option<&'a str>,
    pub fecha: Option<&'a str>,
}

impl TryFrom<Customer> for DomainCustomer {
    type Error = TypeConstraintError;

    fn try_from(row: Customer) -> Result<Self, Self::Error> {
        let id = CustomerId::new(row.id)?;
        let fields = CustomerFields {
            nombre: Some(row.nombre).filter(|n| !n.is_empty()),
            apellidos: row.apellidos,
            empresa: row.empresa,
            razon_social: row.razon_social,
            rubro: row.rubro,
            tipo_cliente: row.tipo_cliente,
            medio_contacto: row.medio_contacto,
            comentario: row.comentario,
            etapa: row.etapa,
            cargo: row.cargo,
            ruc: row.ruc,
            telefono: row.telefono,
            email: row.email,
            pagina_web: row.pagina_web,
            direccion: row.direccion,
            distrito: row.distrito,
            provincia: row.provincia,
            fecha: row.fecha,
        };
        Ok(DomainCustomer::new(id, fields))
    }
}

impl<'a> NewCustomer<'a> {
    /// Builds the row for `customer` under the key chosen by the store.
    pub fn with_id(id: &'a str, customer: &'a DomainNewCustomer) -> Self {
        let f = &customer.fields;
        Self {
            id,
            nombre: f.nombre.as_deref().unwrap_or_default(),
            apellidos: f.apellidos.as_deref(),
            empresa: f.empresa.as_deref(),
            razon_social: f.razon_social.as_deref(),
            rubro: f.rubro.as_deref(),
            tipo_cliente: f.tipo_cliente.as_deref(),
            medio_contacto: f.medio_contacto.as_deref(),
            comentario: f.comentario.as_deref(),
            etapa: f.etapa.as_deref(),
            cargo: f.cargo.as_deref(),
            ruc: f.ruc.as_deref(),
            telefono: f.telefono.as_deref(),
            email: f.email.as_deref(),
            pagina_web: f.pagina_web.as_deref(),
            direccion: f.direccion.as_deref(),
            distrito: f.distrito.as_deref(),
            provincia: f.provincia.as_deref(),
            fecha: f.fecha.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateCustomer> for UpdateCustomer<'a> {
    fn from(update: &'a DomainUpdateCustomer) -> Self {
        let f = &update.fields;
        Self {
            nombre: f.nombre.as_deref(),
            apellidos: f.apellidos.as_deref(),
            empresa: f.empresa.as_deref(),
            razon_social: f.razon_social.as_deref(),
            rubro: f.rubro.as_deref(),
            tipo_cliente: f.tipo_cliente.as_deref(),
            medio_contacto: f.medio_contacto.as_deref(),
            comentario: f.comentario.as_deref(),
            etapa: f.etapa.as_deref(),
            cargo: f.cargo.as_deref(),
            ruc: f.ruc.as_deref(),
            telefono: f.telefono.as_deref(),
            email: f.email.as_deref(),
            pagina_web: f.pagina_web.as_deref(),
            direccion: f.direccion.as_deref(),
            distrito: f.distrito.as_deref(),
            provincia: f.provincia.as_deref(),
            fecha: f.fecha.as_deref(),
        }
    }
}
