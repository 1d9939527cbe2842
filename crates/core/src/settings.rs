#![forbid(unsafe_code)]

//! The clinic's own contact details, stored as a single settings document.

pub const CLINIC_INFO_KEY: &str = "clinicaInfo";

pub const CLINIC_INFO_FIELDS: [&str; 6] = [
    "nome",
    "endereco",
    "telefone",
    "email",
    "cnpj",
    "horarioFuncionamento",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClinicInfo {
    pub nome: String,
    pub endereco: String,
    pub telefone: String,
    pub email: String,
    pub cnpj: String,
    pub horario_funcionamento: String,
}

impl Default for ClinicInfo {
    fn default() -> Self {
        Self {
            nome: "VetClinic".to_string(),
            endereco: "Av. Principal, 1000".to_string(),
            telefone: "(11) 3456-7890".to_string(),
            email: "contato@vetclinic.com".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            horario_funcionamento:
                "Segunda a Sexta: 08:00 - 18:00, Sábado: 08:00 - 12:00".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClinicInfoError {
    UnknownField(String),
}

impl ClinicInfoError {
    pub fn message(&self) -> String {
        match self {
            Self::UnknownField(name) => format!(
                "clinic info has no field `{name}` (expected one of: {})",
                CLINIC_INFO_FIELDS.join(", ")
            ),
        }
    }
}

impl ClinicInfo {
    /// Every field with an empty value; the starting point when decoding a stored document.
    pub fn blank() -> Self {
        Self {
            nome: String::new(),
            endereco: String::new(),
            telefone: String::new(),
            email: String::new(),
            cnpj: String::new(),
            horario_funcionamento: String::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "nome" => &self.nome,
            "endereco" => &self.endereco,
            "telefone" => &self.telefone,
            "email" => &self.email,
            "cnpj" => &self.cnpj,
            "horarioFuncionamento" => &self.horario_funcionamento,
            _ => return None,
        };
        Some(value.as_str())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), ClinicInfoError> {
        let slot = match name {
            "nome" => &mut self.nome,
            "endereco" => &mut self.endereco,
            "telefone" => &mut self.telefone,
            "email" => &mut self.email,
            "cnpj" => &mut self.cnpj,
            "horarioFuncionamento" => &mut self.horario_funcionamento,
            _ => return Err(ClinicInfoError::UnknownField(name.to_string())),
        };
        *slot = value.into();
        Ok(())
    }

    /// `(field, value)` pairs in display order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        CLINIC_INFO_FIELDS
            .into_iter()
            .map(|name| (name, self.get(name).unwrap_or("")))
    }
}
