use crate::proto::Code;

use super::{MAX_CONTAINER_DEPTH, MAX_DEPTH, MAX_SIGNATURE, SignatureError, SignatureErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Array,
    Struct,
    Dict,
}

/// Validate a signature, returning the first violation of the grammar.
pub(super) fn validate(bytes: &[u8]) -> Result<(), SignatureError> {
    use SignatureErrorKind::*;

    if bytes.len() >= MAX_SIGNATURE {
        return Err(SignatureError::new(SignatureTooLong));
    }

    // Open containers together with the number of complete types seen inside
    // of them.
    let mut stack = Vec::<(Kind, usize)>::new();
    let mut arrays = 0;
    let mut structs = 0;

    for &b in bytes {
        let code = Code::new(b);

        let mut is_basic = match code {
            Code::ARRAY => {
                if arrays == MAX_CONTAINER_DEPTH || stack.len() == MAX_DEPTH {
                    return Err(SignatureError::new(ExceededMaximumArrayRecursion));
                }

                stack.push((Kind::Array, 0));
                arrays += 1;
                continue;
            }
            Code::OPEN_PAREN => {
                if structs == MAX_CONTAINER_DEPTH || stack.len() == MAX_DEPTH {
                    return Err(SignatureError::new(ExceededMaximumStructRecursion));
                }

                stack.push((Kind::Struct, 0));
                structs += 1;
                continue;
            }
            Code::CLOSE_PAREN => {
                let n = match stack.pop() {
                    Some((Kind::Struct, n)) => n,
                    Some((Kind::Array, _)) => {
                        return Err(SignatureError::new(MissingArrayElementType));
                    }
                    _ => return Err(SignatureError::new(StructEndedButNotStarted)),
                };

                if n == 0 {
                    return Err(SignatureError::new(StructHasNoFields));
                }

                structs -= 1;
                false
            }
            Code::OPEN_BRACE => {
                if stack.len() == MAX_DEPTH {
                    return Err(SignatureError::new(ExceededMaximumDictRecursion));
                }

                stack.push((Kind::Dict, 0));
                continue;
            }
            Code::CLOSE_BRACE => {
                let n = match stack.pop() {
                    Some((Kind::Dict, n)) => n,
                    Some((Kind::Array, _)) => {
                        return Err(SignatureError::new(MissingArrayElementType));
                    }
                    _ => return Err(SignatureError::new(DictEndedButNotStarted)),
                };

                match n {
                    0 => return Err(SignatureError::new(DictEntryHasNoFields)),
                    1 => return Err(SignatureError::new(DictEntryHasOnlyOneField)),
                    2 => {}
                    _ => return Err(SignatureError::new(DictEntryHasTooManyFields)),
                }

                if !matches!(stack.last(), Some((Kind::Array, _))) {
                    return Err(SignatureError::new(DictEntryNotInsideArray));
                }

                false
            }
            Code::VARIANT => false,
            code if code.is_basic() => true,
            code => return Err(SignatureError::new(UnknownTypeCode(code))),
        };

        // A complete type closes every array which is waiting for its element.
        while let Some((Kind::Array, _)) = stack.last() {
            stack.pop();
            arrays -= 1;
            is_basic = false;
        }

        if let Some((kind, n)) = stack.last_mut() {
            if *kind == Kind::Dict && *n == 0 && !is_basic {
                return Err(SignatureError::new(DictKeyMustBeBasicType));
            }

            *n += 1;
        }
    }

    match stack.pop() {
        Some((Kind::Array, _)) => Err(SignatureError::new(MissingArrayElementType)),
        Some((Kind::Struct, _)) => Err(SignatureError::new(StructStartedButNotEnded)),
        Some((Kind::Dict, _)) => Err(SignatureError::new(DictStartedButNotEnded)),
        None => Ok(()),
    }
}
