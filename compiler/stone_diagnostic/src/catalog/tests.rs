use super::*;

#[test]
fn test_ids_are_dense() {
    for (i, id) in DiagId::ALL.iter().enumerate() {
        assert_eq!(id.index(), i);
        assert_eq!(*id as u32 as usize, i);
    }
    assert_eq!(DiagId::COUNT, DiagId::ALL.len());
}

#[test]
fn test_names_round_trip() {
    for &id in DiagId::ALL {
        assert_eq!(DiagId::from_name(id.name()), Some(id));
    }
    assert_eq!(DiagId::from_name("NotADiagnostic"), None);
    assert_eq!(DiagId::UnusedVariable.to_string(), "UnusedVariable");
}

#[test]
fn test_info() {
    let info = DiagId::ExpectedToken.info();
    assert_eq!(info.level, DiagnosticLevel::Error);
    assert!(info.options.contains(DiagOptions::POINTS_TO_FIRST_BAD_TOKEN));
    assert_eq!(info.format, "expected '%0'");
}

#[test]
fn test_fatal_option_raises_base_level() {
    assert_eq!(DiagId::NoSuchModule.info().base_level(), DiagnosticLevel::Fatal);
    assert_eq!(DiagId::UnknownType.info().base_level(), DiagnosticLevel::Error);
    assert_eq!(DiagId::UnusedVariable.info().base_level(), DiagnosticLevel::Warning);
}

#[test]
fn test_typed_constants_carry_ids() {
    assert_eq!(diag::ExpectedToken.id(), DiagId::ExpectedToken);
    assert_eq!(diag::UnreachableCode.id(), DiagId::UnreachableCode);
    assert_eq!(format!("{:?}", diag::DeclaredHere), "Diag(DeclaredHere)");
}

#[test]
fn test_every_placeholder_has_an_argument_slot() {
    // `%N` never exceeds the highest placeholder index any entry declares.
    for &id in DiagId::ALL {
        let format = id.info().format;
        let mut chars = format.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '%' {
                let next = chars.next();
                assert!(
                    matches!(next, Some('0'..='9' | '%')),
                    "{}: stray '%' in {format:?}",
                    id.name()
                );
            }
        }
    }
}
