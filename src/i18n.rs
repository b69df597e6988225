//! Bilingual (en/es) message catalogue.
//!
//! The response language is resolved once per request from the `lang` query
//! parameter and passed around as a plain [`Lang`] value.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Es,
}

impl Lang {
    /// Unknown or missing values fall back to English.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("es") => Self::Es,
            _ => Self::En,
        }
    }

    /// Reads `lang` from a raw query string.
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        let Some(query) = query else {
            return Self::En;
        };

        let value = url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "lang")
            .map(|(_, v)| v.into_owned());

        Self::parse(value.as_deref())
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Every user-facing envelope message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    ApiSuccess,
    ApiError,
    InvalidData,
    Unauthenticated,
    PermissionDenied,
    NotFound,
    LoginError,
    LogoutSuccess,
    WeatherSuccess,
    WeatherError,
    FavoriteAddSuccess,
    FavoriteAddError,
    FavoriteCityExists,
    FavoriteRemoveSuccess,
    FavoriteRemoveError,
    FavoriteNotFound,
    FavoriteGetError,
    SearchHistoryGetError,
    UserListError,
    UserCreateSuccess,
    UserCreateError,
    UserUpdateSuccess,
    UserNotFound,
    UserDeleted,
}

impl Msg {
    #[must_use]
    pub const fn text(self, lang: Lang) -> &'static str {
        match lang {
            Lang::En => self.en(),
            Lang::Es => self.es(),
        }
    }

    const fn en(self) -> &'static str {
        match self {
            Self::ApiSuccess => "Successful request, everything went well!",
            Self::ApiError => "Error processing the request",
            Self::InvalidData => "Invalid data",
            Self::Unauthenticated => "You are not authenticated.",
            Self::PermissionDenied => "You do not have the required permissions to access this route.",
            Self::NotFound => "Resource not found",
            Self::LoginError => "Invalid credentials",
            Self::LogoutSuccess => "Logged out successfully",
            Self::WeatherSuccess => "Weather data retrieved successfully",
            Self::WeatherError => "Error retrieving weather data",
            Self::FavoriteAddSuccess => "City added to favorites",
            Self::FavoriteAddError => "Error adding city to favorites",
            Self::FavoriteCityExists => "City already exists in favorites",
            Self::FavoriteRemoveSuccess => "City removed from favorites",
            Self::FavoriteRemoveError => "Error removing city from favorites",
            Self::FavoriteNotFound => "City not found in favorites",
            Self::FavoriteGetError => "Error retrieving favorite cities",
            Self::SearchHistoryGetError => "Error retrieving search history",
            Self::UserListError => "Error retrieving user list",
            Self::UserCreateSuccess => "User created successfully",
            Self::UserCreateError => "Error creating user",
            Self::UserUpdateSuccess => "User updated successfully",
            Self::UserNotFound => "User not found",
            Self::UserDeleted => "User deleted successfully",
        }
    }

    const fn es(self) -> &'static str {
        match self {
            Self::ApiSuccess => "Solicitud exitosa, ¡todo salió bien!",
            Self::ApiError => "Error al procesar la solicitud",
            Self::InvalidData => "Datos inválidos",
            Self::Unauthenticated => "No estás autenticado en el sistema.",
            Self::PermissionDenied => "No tiene los permisos necesarios para acceder a esta ruta.",
            Self::NotFound => "Recurso no encontrado",
            Self::LoginError => "Credenciales inválidas",
            Self::LogoutSuccess => "Cierre de sesión exitoso",
            Self::WeatherSuccess => "Datos del clima recuperados exitosamente",
            Self::WeatherError => "Error al recuperar los datos del clima",
            Self::FavoriteAddSuccess => "Ciudad añadida a favoritos",
            Self::FavoriteAddError => "Error al añadir la ciudad a favoritos",
            Self::FavoriteCityExists => "La ciudad ya existe en favoritos",
            Self::FavoriteRemoveSuccess => "Ciudad eliminada de favoritos",
            Self::FavoriteRemoveError => "Error al eliminar la ciudad de favoritos",
            Self::FavoriteNotFound => "Ciudad no encontrada en favoritos",
            Self::FavoriteGetError => "Error al recuperar las ciudades favoritas",
            Self::SearchHistoryGetError => "Error al recuperar el historial de búsqueda",
            Self::UserListError => "Error al recuperar la lista de usuarios",
            Self::UserCreateSuccess => "Usuario creado exitosamente",
            Self::UserCreateError => "Error al crear el usuario",
            Self::UserUpdateSuccess => "Usuario actualizado exitosamente",
            Self::UserNotFound => "Usuario no encontrado",
            Self::UserDeleted => "Usuario eliminado exitosamente",
        }
    }
}

/// Field-level validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    String,
    MinLen(usize),
    MaxLen(usize),
    Email,
    Unique,
    Confirmed,
    Integer,
    MinValue(u64),
    MaxValue(u64),
    OneOf(&'static [&'static str]),
    Exists,
}

impl Rule {
    #[must_use]
    pub fn message(self, field: &str, lang: Lang) -> String {
        let label = field.replace('_', " ");
        match (lang, self) {
            (Lang::En, Self::Required) => format!("The {label} field is required."),
            (Lang::En, Self::String) => format!("The {label} field must be a string."),
            (Lang::En, Self::MinLen(n)) => {
                format!("The {label} field must be at least {n} characters.")
            }
            (Lang::En, Self::MaxLen(n)) => {
                format!("The {label} field must not be greater than {n} characters.")
            }
            (Lang::En, Self::Email) => {
                format!("The {label} field must be a valid email address.")
            }
            (Lang::En, Self::Unique) => format!("The {label} has already been taken."),
            (Lang::En, Self::Confirmed) => {
                format!("The {label} field confirmation does not match.")
            }
            (Lang::En, Self::Integer) => format!("The {label} field must be an integer."),
            (Lang::En, Self::MinValue(n)) => format!("The {label} field must be at least {n}."),
            (Lang::En, Self::MaxValue(n)) => {
                format!("The {label} field must not be greater than {n}.")
            }
            (Lang::En, Self::OneOf(values)) => format!(
                "The selected {label} is invalid. Allowed values: {}.",
                values.join(", ")
            ),
            (Lang::En, Self::Exists) => format!("The selected {label} is invalid."),

            (Lang::Es, Self::Required) => format!("El campo {label} es obligatorio."),
            (Lang::Es, Self::String) => format!("El campo {label} debe ser una cadena de texto."),
            (Lang::Es, Self::MinLen(n)) => {
                format!("El campo {label} debe tener al menos {n} caracteres.")
            }
            (Lang::Es, Self::MaxLen(n)) => {
                format!("El campo {label} no debe tener más de {n} caracteres.")
            }
            (Lang::Es, Self::Email) => {
                format!("El campo {label} debe ser una dirección de correo válida.")
            }
            (Lang::Es, Self::Unique) => format!("El valor del campo {label} ya está en uso."),
            (Lang::Es, Self::Confirmed) => {
                format!("La confirmación del campo {label} no coincide.")
            }
            (Lang::Es, Self::Integer) => format!("El campo {label} debe ser un número entero."),
            (Lang::Es, Self::MinValue(n)) => format!("El campo {label} debe ser al menos {n}."),
            (Lang::Es, Self::MaxValue(n)) => {
                format!("El campo {label} no debe ser mayor que {n}.")
            }
            (Lang::Es, Self::OneOf(values)) => format!(
                "El {label} seleccionado no es válido. Valores permitidos: {}.",
                values.join(", ")
            ),
            (Lang::Es, Self::Exists) => format!("El {label} seleccionado no es válido."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_parse_falls_back_to_english() {
        assert_eq!(Lang::parse(Some("es")), Lang::Es);
        assert_eq!(Lang::parse(Some("en")), Lang::En);
        assert_eq!(Lang::parse(Some("fr")), Lang::En);
        assert_eq!(Lang::parse(None), Lang::En);
    }

    #[test]
    fn test_lang_from_query() {
        assert_eq!(Lang::from_query(Some("city=Madrid&lang=es")), Lang::Es);
        assert_eq!(Lang::from_query(Some("lang=de")), Lang::En);
        assert_eq!(Lang::from_query(Some("city=Paris")), Lang::En);
        assert_eq!(Lang::from_query(None), Lang::En);
    }

    #[test]
    fn test_messages_are_localized() {
        assert_eq!(Msg::LoginError.text(Lang::En), "Invalid credentials");
        assert_eq!(Msg::LoginError.text(Lang::Es), "Credenciales inválidas");
        assert_ne!(
            Msg::FavoriteCityExists.text(Lang::En),
            Msg::FavoriteCityExists.text(Lang::Es)
        );
    }

    #[test]
    fn test_rule_messages() {
        assert_eq!(
            Rule::MinLen(3).message("city", Lang::En),
            "The city field must be at least 3 characters."
        );
        assert_eq!(
            Rule::Required.message("order_direction", Lang::En),
            "The order direction field is required."
        );
        assert!(Rule::Unique.message("email", Lang::Es).contains("ya está en uso"));
    }
}
