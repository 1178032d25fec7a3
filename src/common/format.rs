// src/common/format.rs

/// Mantém apenas os dígitos (telefone, CPF/CNPJ, CEP).
pub fn only_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Igual a `only_digits`, mas descarta o resultado vazio.
pub fn digits_or_none(raw: Option<&str>) -> Option<String> {
    raw.map(only_digits).filter(|d| !d.is_empty())
}
