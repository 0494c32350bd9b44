//! Client-side validation of record inputs.
//!
//! Inputs are checked before they are sent so that missing fields are
//! reported per field instead of as one backend error. The rules mirror the
//! backend schemas. Enumerated fields are typed; only the fallback variants
//! that decoding produces for unrecognised backend text are refused.

use std::fmt;

use crate::error::{Error, Result};
use crate::types::{
    ChequeoGfeInput, DonadoraInput, DraftInput, EstadoGestacion, ExtraccionInput,
    FecundacionInput, Finalidad, SesionOpuInput, SesionTransferenciaInput, TipoGanado,
    TransferenciaInput,
};

/// A validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path, e.g. `nombre` or `extracciones[1].numero_secuencial`.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Renders a list of errors as `field: message; field: message`.
    pub fn join(errors: &[FieldError]) -> String {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A value that can be checked before submission.
pub trait Validate {
    /// Returns every field error, in field order.
    fn validate(&self) -> std::result::Result<(), Vec<FieldError>>;

    /// Same as [`validate`](Validate::validate), as a core [`Error`].
    fn check(&self) -> Result<()> {
        self.validate().map_err(Error::from)
    }
}

#[derive(Default)]
struct Checks {
    prefix: String,
    errors: Vec<FieldError>,
}

impl Checks {
    fn nested(prefix: String) -> Self {
        Self {
            prefix,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .push(FieldError::new(format!("{}{field}", self.prefix), message));
    }

    fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        }
        self
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.fail(field, format!("must be at most {max} characters"));
        }
        self
    }

    fn max_len_opt(&mut self, field: &str, value: &Option<String>, max: usize) -> &mut Self {
        if let Some(value) = value {
            self.max_len(field, value, max);
        }
        self
    }

    fn at_least(&mut self, field: &str, value: i32, min: i32) -> &mut Self {
        if value < min {
            self.fail(field, format!("must be at least {min}"));
        }
        self
    }

    fn known(&mut self, field: &str, unknown: bool) -> &mut Self {
        if unknown {
            self.fail(field, "has an unrecognised value");
        }
        self
    }

    fn finish(self) -> std::result::Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

impl Validate for DonadoraInput {
    fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut c = Checks::default();
        c.required("nombre", &self.nombre)
            .max_len("nombre", &self.nombre, 100)
            .required("numero_registro", &self.numero_registro)
            .max_len("numero_registro", &self.numero_registro, 50)
            .required("raza", &self.raza)
            .known("tipo_ganado", self.tipo_ganado == TipoGanado::Otro)
            .required("propietario_nombre", &self.propietario_nombre);
        if let Some(peso) = self.peso_kg
            && peso <= 0.0
        {
            c.fail("peso_kg", "must be greater than 0");
        }
        c.finish()
    }
}

fn check_extraccion(index: usize, e: &ExtraccionInput, errors: &mut Vec<FieldError>) {
    let mut c = Checks::nested(format!("extracciones[{index}]."));
    c.at_least("numero_secuencial", e.numero_secuencial, 1);
    match (&e.donadora_id, &e.nueva_donadora) {
        (None, None) => c.fail("donadora_id", "is required"),
        (_, Some(nueva)) => {
            c.required("nueva_donadora.nombre", &nueva.nombre)
                .required("nueva_donadora.numero_registro", &nueva.numero_registro)
                .required("nueva_donadora.raza", &nueva.raza)
                .known("nueva_donadora.tipo_ganado", nueva.tipo_ganado == TipoGanado::Otro)
                .required("nueva_donadora.propietario_nombre", &nueva.propietario_nombre);
        }
        (Some(_), None) => {}
    }
    errors.extend(c.errors);
}

impl Validate for ExtraccionInput {
    fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_extraccion(0, self, &mut errors);
        // standalone extractions report unprefixed field names
        for e in &mut errors {
            e.field = e.field.trim_start_matches("extracciones[0].").to_string();
        }
        Checks {
            prefix: String::new(),
            errors,
        }
        .finish()
    }
}

impl Validate for SesionOpuInput {
    fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut c = Checks::default();
        c.required("tecnico_opu", &self.tecnico_opu)
            .required("tecnico_busqueda", &self.tecnico_busqueda)
            .required("cliente", &self.cliente)
            .known("finalidad", self.finalidad == Finalidad::Otra);
        for (i, e) in self.extracciones.iter().enumerate() {
            check_extraccion(i, e, &mut c.errors);
        }
        c.finish()
    }
}

impl Validate for FecundacionInput {
    fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut c = Checks::default();
        c.required("laboratorista", &self.laboratorista);
        c.finish()
    }
}

impl Validate for SesionTransferenciaInput {
    fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut c = Checks::default();
        c.required("tecnico_transferencia", &self.tecnico_transferencia)
            .max_len("tecnico_transferencia", &self.tecnico_transferencia, 100)
            .required("cliente", &self.cliente)
            .max_len("cliente", &self.cliente, 100)
            .max_len_opt("hora_inicio", &self.hora_inicio, 10)
            .max_len_opt("hora_final", &self.hora_final, 10)
            .max_len_opt("hacienda", &self.hacienda, 100)
            .max_len_opt("receptoras", &self.receptoras, 255);
        c.finish()
    }
}

impl Validate for TransferenciaInput {
    fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut c = Checks::default();
        c.at_least("numero_secuencial", self.numero_secuencial, 1);
        c.finish()
    }
}

impl Validate for ChequeoGfeInput {
    fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut c = Checks::default();
        c.required("receptora", &self.receptora)
            .required("tecnico_chequeo", &self.tecnico_chequeo)
            .required("cliente", &self.cliente)
            .known("estado", self.estado == EstadoGestacion::Otro);
        c.finish()
    }
}

impl Validate for DraftInput {
    fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut c = Checks::default();
        c.required("modulo", &self.modulo)
            .max_len("modulo", &self.modulo, 50)
            .required("tipo_registro", &self.tipo_registro)
            .max_len("tipo_registro", &self.tipo_registro, 50);
        c.finish()
    }
}
