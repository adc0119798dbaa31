//! Helper macros for CPU dtype dispatch

/// Dispatch on a numeric dtype, binding `$T` to the matching Rust type.
///
/// `Bool` and half-precision types without the `f16` feature return
/// `Error::UnsupportedDType` from the enclosing function.
macro_rules! dispatch_dtype {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            DType::F64 => {
                type $T = f64;
                $body
            }
            DType::F32 => {
                type $T = f32;
                $body
            }
            #[cfg(feature = "f16")]
            DType::F16 => {
                type $T = half::f16;
                $body
            }
            #[cfg(feature = "f16")]
            DType::BF16 => {
                type $T = half::bf16;
                $body
            }
            DType::I64 => {
                type $T = i64;
                $body
            }
            DType::I32 => {
                type $T = i32;
                $body
            }
            DType::I16 => {
                type $T = i16;
                $body
            }
            DType::I8 => {
                type $T = i8;
                $body
            }
            DType::U64 => {
                type $T = u64;
                $body
            }
            DType::U32 => {
                type $T = u32;
                $body
            }
            DType::U16 => {
                type $T = u16;
                $body
            }
            DType::U8 => {
                type $T = u8;
                $body
            }
            #[allow(unreachable_patterns)]
            other => {
                return Err(Error::UnsupportedDType {
                    dtype: other,
                    op: $error_op,
                });
            }
        }
    };
}

pub(crate) use dispatch_dtype;
