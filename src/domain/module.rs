//! Modules selectable from the dashboard sidebar.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// The one module rendered by the dashboard shell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardModule {
    #[default]
    Inicio,
    Clientes,
    Reportes,
}

impl DashboardModule {
    pub const ALL: [DashboardModule; 3] = [
        DashboardModule::Inicio,
        DashboardModule::Clientes,
        DashboardModule::Reportes,
    ];

    /// Parses the `modulo` query value; unknown names select the home module.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("clientes") => DashboardModule::Clientes,
            Some("reportes") => DashboardModule::Reportes,
            _ => DashboardModule::Inicio,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DashboardModule::Inicio => "inicio",
            DashboardModule::Clientes => "clientes",
            DashboardModule::Reportes => "reportes",
        }
    }

    pub const fn template(self) -> &'static str {
        match self {
            DashboardModule::Inicio => "dashboard/inicio.html",
            DashboardModule::Clientes => "dashboard/clientes.html",
            DashboardModule::Reportes => "dashboard/reportes.html",
        }
    }
}

impl Display for DashboardModule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
