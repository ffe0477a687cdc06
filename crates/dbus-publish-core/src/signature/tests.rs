use crate::proto::Code;

use super::{MAX_SIGNATURE, Signature, SignatureBuilder, SignatureError, SignatureErrorKind};

use SignatureErrorKind::*;

macro_rules! test {
    ($input:expr, $expected:pat) => {{
        let actual = Signature::new($input).map_err(|e| e.kind);

        assert!(
            matches!(actual, $expected),
            "{actual:?} does not match {}",
            stringify!($expected)
        );
    }};
}

#[test]
fn signature_grammar() {
    test!("", Ok(..));
    test!("sss", Ok(..));
    test!("i", Ok(..));
    test!("ai", Ok(..));
    test!("(i)", Ok(..));
    test!("a{sv}", Ok(..));
    test!("aa{s(iv)}", Ok(..));
    test!("w", Err(UnknownTypeCode(..)));
    test!("a", Err(MissingArrayElementType));
    test!("ii(ii)a", Err(MissingArrayElementType));
    test!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaai", Ok(..));
    test!(
        "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaai",
        Err(ExceededMaximumArrayRecursion)
    );
    test!(")", Err(StructEndedButNotStarted));
    test!("}", Err(DictEndedButNotStarted));
    test!("a)", Err(MissingArrayElementType));
    test!("(ai", Err(StructStartedButNotEnded));
    test!("()", Err(StructHasNoFields));
    test!("a()", Err(StructHasNoFields));
    test!("(a)", Err(MissingArrayElementType));
    test!("a{}", Err(DictEntryHasNoFields));
    test!("a{aii}", Err(DictKeyMustBeBasicType));
    test!("a{vs}", Err(DictKeyMustBeBasicType));
    test!("a{(ii)i}", Err(DictKeyMustBeBasicType));
    test!("a{i}", Err(DictEntryHasOnlyOneField));
    test!("{is}", Err(DictEntryNotInsideArray));
    test!("a{isi}", Err(DictEntryHasTooManyFields));
    test!("a{is", Err(DictStartedButNotEnded));
    test!("not a valid signature", Err(UnknownTypeCode(..)));
    test!(&"i".repeat(255), Ok(..));
    test!(&"i".repeat(MAX_SIGNATURE), Err(SignatureTooLong));
}

#[test]
fn array_depth_is_released() {
    // Sibling arrays don't count towards the nesting depth.
    let siblings = "ai".repeat(40);
    test!(&siblings, Ok(..));
}

#[test]
fn struct_detection() -> Result<(), SignatureError> {
    assert!(Signature::new("(i)")?.is_struct());
    assert!(Signature::new("((i)s)")?.is_struct());
    assert!(!Signature::new("(i)(s)")?.is_struct());
    assert!(!Signature::new("a(i)")?.is_struct());
    assert!(!Signature::EMPTY.is_struct());
    Ok(())
}

#[test]
fn builder() -> Result<(), SignatureError> {
    let mut builder = SignatureBuilder::new();
    builder.open_array()?;
    builder.open_dict()?;
    builder.push(Code::STRING)?;
    builder.push(Code::VARIANT)?;
    builder.close_dict()?;
    builder.close_array()?;
    assert_eq!(builder.finish()?, "a{sv}");

    let mut builder = SignatureBuilder::new();
    builder.open_struct()?;
    builder.close_struct()?;
    assert_eq!(builder.finish().map_err(|e| e.kind), Err(StructHasNoFields));

    let mut builder = SignatureBuilder::new();
    assert_eq!(
        builder.push(Code::ARRAY).map_err(|e| e.kind),
        Err(UnknownTypeCode(Code::ARRAY))
    );
    assert_eq!(
        builder.close_struct().map_err(|e| e.kind),
        Err(ContainerNotOpen)
    );
    Ok(())
}

#[test]
fn builder_limits() {
    let mut builder = SignatureBuilder::new();

    for _ in 0..32 {
        assert!(builder.open_struct().is_ok());
    }

    let error = builder.open_struct().unwrap_err();
    assert!(error.is_limit());
    assert_eq!(error.kind, ExceededMaximumStructRecursion);

    let mut builder = SignatureBuilder::new();
    let long = Signature::new(&"i".repeat(200)).unwrap();
    assert!(builder.extend_from_signature(&long).is_ok());
    assert_eq!(
        builder.extend_from_signature(&long).map_err(|e| e.kind),
        Err(SignatureTooLong)
    );
}
