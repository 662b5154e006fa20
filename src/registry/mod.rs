//! The fixed registry of supported image operations.
//!
//! Each operation is one variant of [`OperationKind`], carrying a typed
//! parameter record: wire key, display label, registered default, and legal
//! range. The range is informational — it is exposed so a form layer can
//! render appropriate controls, but the core never enforces it (parameter
//! semantics are validated by the processing engine, not here).

use crate::graph::{ParamMap, ParamValue};
use std::fmt;

/// The registered default for a parameter key, filled in by the compiler
/// when a stage leaves the key unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDefault {
    Integer(i64),
    Text(&'static str),
}

impl ParamDefault {
    pub fn value(&self) -> ParamValue {
        match self {
            ParamDefault::Integer(v) => ParamValue::Integer(*v),
            ParamDefault::Text(v) => ParamValue::Text((*v).to_string()),
        }
    }
}

/// The legal range of a parameter, for form rendering only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamRange {
    /// An integer slider: `min..=max`, advancing by `step`.
    IntRange { min: i64, max: i64, step: i64 },
    /// A fixed set of choices.
    Choice(&'static [&'static str]),
}

/// One parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// The key used on the wire and in stage parameter maps.
    pub key: &'static str,
    /// Human-readable label for form controls.
    pub label: &'static str,
    pub default: ParamDefault,
    pub range: ParamRange,
}

/// Master macro defining every supported operation: the tagged enum variant,
/// the wire-name lookup, and the typed parameter specs, all in one place.
macro_rules! define_operations {
    ( $( ($variant:ident, $name:literal, $label:literal,
          [ $( ($key:literal, $plabel:literal, $default:expr, $range:expr) ),* $(,)? ]) ),* $(,)? ) => {
        /// A supported operation, one variant per registry entry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum OperationKind {
            $( $variant, )*
        }

        impl OperationKind {
            /// Every registered operation, in palette order.
            pub const ALL: &'static [OperationKind] = &[ $( OperationKind::$variant, )* ];

            /// The wire name exchanged with the processing engine.
            pub fn name(self) -> &'static str {
                match self { $( Self::$variant => $name, )* }
            }

            /// Human-readable label for palette entries.
            pub fn label(self) -> &'static str {
                match self { $( Self::$variant => $label, )* }
            }

            /// Looks an operation up by its wire name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// The typed parameter specs of this operation.
            pub fn params(self) -> &'static [ParamSpec] {
                match self {
                    $( Self::$variant => &[
                        $( ParamSpec {
                            key: $key,
                            label: $plabel,
                            default: $default,
                            range: $range,
                        }, )*
                    ], )*
                }
            }
        }
    };
}

define_operations! {
    (Grayscale, "grayscale", "Grayscale", []),
    (Blur, "blur", "Blur", [
        ("kernelSize", "Kernel Size", ParamDefault::Integer(5),
         ParamRange::IntRange { min: 1, max: 31, step: 2 }),
    ]),
    (Canny, "canny", "Canny", [
        ("threshold1", "Min Threshold", ParamDefault::Integer(100),
         ParamRange::IntRange { min: 0, max: 255, step: 1 }),
        ("threshold2", "Max Threshold", ParamDefault::Integer(200),
         ParamRange::IntRange { min: 0, max: 255, step: 1 }),
    ]),
    (Threshold, "threshold", "Threshold", [
        ("thresh", "Threshold", ParamDefault::Integer(127),
         ParamRange::IntRange { min: 0, max: 255, step: 1 }),
        ("maxval", "Max Value", ParamDefault::Integer(255),
         ParamRange::IntRange { min: 0, max: 255, step: 1 }),
    ]),
    (Blue, "blue", "Blue Channel", []),
    (Red, "red", "Red Channel", []),
    (Green, "green", "Green Channel", []),
    (Rotate, "rotate", "Rotate", [
        ("angle", "Angle", ParamDefault::Integer(90),
         ParamRange::IntRange { min: -360, max: 360, step: 1 }),
    ]),
    (HistogramEqualization, "histogram_equalization", "Histogram Equalization", []),
    (Sharpen, "sharpen", "Sharpen", [
        ("strength", "Strength", ParamDefault::Integer(2),
         ParamRange::IntRange { min: 1, max: 5, step: 1 }),
    ]),
    (ColorQuantization, "color_quantization", "Color Quantization", [
        ("q_color", "Colors", ParamDefault::Integer(10),
         ParamRange::IntRange { min: 2, max: 32, step: 1 }),
    ]),
    (Cartoon, "cartoon", "Cartoon", [
        ("c_color", "Colors", ParamDefault::Integer(4),
         ParamRange::IntRange { min: 1, max: 8, step: 1 }),
    ]),
    (FourierTransform, "fourier_transform", "Fourier Transform", []),
    (EdgeDetection, "edge_detection", "Edge Detection", [
        ("method", "Method", ParamDefault::Text("sobel"),
         ParamRange::Choice(&["sobel", "scharr", "laplacian"])),
        ("ksize", "Kernel Size", ParamDefault::Integer(3),
         ParamRange::IntRange { min: 1, max: 7, step: 2 }),
    ]),
    (Stylization, "stylization", "Stylization", [
        ("stylization_strength", "Style Strength", ParamDefault::Integer(100),
         ParamRange::IntRange { min: 1, max: 200, step: 1 }),
        ("edge_preserve", "Edge Preservation", ParamDefault::Integer(50),
         ParamRange::IntRange { min: 1, max: 100, step: 1 }),
    ]),
    // The point editor for the corner coordinates was never implemented in
    // the editor; the engine falls back to the image corners.
    (PerspectiveTransform, "perspective_transform", "Perspective Transform", []),
}

impl OperationKind {
    /// A parameter map holding exactly the registered defaults.
    pub fn default_params(self) -> ParamMap {
        self.params()
            .iter()
            .map(|spec| (spec.key.to_string(), spec.default.value()))
            .collect()
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
