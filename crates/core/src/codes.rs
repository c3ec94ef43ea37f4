//! Document-type code table.
//!
//! Single source of truth for the DTE type code -> display label mapping.
//! Both the interactive list response and the export row mapper resolve
//! labels through this module so the two can never disagree.

/// Fixed mapping of DTE type codes to their display labels.
pub const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("01", "Factura Electrónica"),
    ("03", "Crédito Fiscal"),
    ("04", "Nota de Remisión"),
    ("05", "Nota de Crédito"),
    ("07", "Comprobante de Retención"),
    ("11", "Factura de Exportación"),
    ("14", "Factura de Sujeto Excluido"),
];

/// Resolves a DTE type code to its display label.
///
/// Codes not present in the table pass through unmodified; an unknown code
/// is never an error.
#[must_use]
pub fn document_type_label(code: &str) -> &str {
    DOCUMENT_TYPES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |(_, label)| label)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("01", "Factura Electrónica")]
    #[case("03", "Crédito Fiscal")]
    #[case("05", "Nota de Crédito")]
    #[case("14", "Factura de Sujeto Excluido")]
    fn test_known_codes_resolve_to_labels(#[case] code: &str, #[case] label: &str) {
        assert_eq!(document_type_label(code), label);
    }

    #[rstest]
    #[case("99")]
    #[case("")]
    fn test_unknown_code_passes_through(#[case] code: &str) {
        assert_eq!(document_type_label(code), code);
    }

    #[test]
    fn test_table_has_no_duplicate_codes() {
        for (i, (code, _)) in DOCUMENT_TYPES.iter().enumerate() {
            assert!(
                !DOCUMENT_TYPES[i + 1..].iter().any(|(c, _)| c == code),
                "duplicate code {code}"
            );
        }
    }
}
