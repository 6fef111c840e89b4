//! The `JobParameters` schema
//!
//! Everything a document-cleaning job needs to know up front: page layout,
//! sheet ranges, which filters run on which sheets and how they are tuned.

use super::{EnumDescriptor, FieldDescriptor, FieldType, MessageDescriptor};

pub static LAYOUT: EnumDescriptor = EnumDescriptor {
    name: "Layout",
    values: &[
        ("LAYOUT_NONE", 0),
        ("LAYOUT_SINGLE", 1),
        ("LAYOUT_DOUBLE", 2),
    ],
};

pub static DIRECTION: EnumDescriptor = EnumDescriptor {
    name: "Direction",
    values: &[
        ("DIRECTION_NONE", 0),
        ("DIRECTION_HORIZONTAL", 1),
        ("DIRECTION_VERTICAL", 2),
    ],
};

pub static INTERPOLATION: EnumDescriptor = EnumDescriptor {
    name: "Interpolation",
    values: &[
        ("INTERPOLATION_NEAREST", 0),
        ("INTERPOLATION_LINEAR", 1),
        ("INTERPOLATION_CUBIC", 2),
    ],
};

pub static POINT: MessageDescriptor = MessageDescriptor {
    name: "Point",
    fields: &[
        FieldDescriptor::optional("x", 1, FieldType::Int32),
        FieldDescriptor::optional("y", 2, FieldType::Int32),
    ],
};

pub static RECTANGLE: MessageDescriptor = MessageDescriptor {
    name: "Rectangle",
    fields: &[
        FieldDescriptor::required("top_left", 1, FieldType::Message(&POINT)),
        FieldDescriptor::required("bottom_right", 2, FieldType::Message(&POINT)),
    ],
};

pub static SIZE: MessageDescriptor = MessageDescriptor {
    name: "Size",
    fields: &[
        FieldDescriptor::optional("horizontal", 1, FieldType::UInt32),
        FieldDescriptor::optional("vertical", 2, FieldType::UInt32),
    ],
};

/// Distances from each edge of the sheet
pub static BORDER: MessageDescriptor = MessageDescriptor {
    name: "Border",
    fields: &[
        FieldDescriptor::optional("left", 1, FieldType::Int32),
        FieldDescriptor::optional("top", 2, FieldType::Int32),
        FieldDescriptor::optional("right", 3, FieldType::Int32),
        FieldDescriptor::optional("bottom", 4, FieldType::Int32),
    ],
};

/// A selection of sheets. `-1` alone disables everything, an empty
/// selection allows everything.
pub static MULTI_INDEX: MessageDescriptor = MessageDescriptor {
    name: "MultiIndex",
    fields: &[FieldDescriptor::packed("index", 1, FieldType::Int32)],
};

pub static BLACKFILTER_PARAMETERS: MessageDescriptor = MessageDescriptor {
    name: "BlackfilterParameters",
    fields: &[
        FieldDescriptor::optional("scan_size", 1, FieldType::Message(&SIZE)),
        FieldDescriptor::optional("scan_step", 2, FieldType::Message(&SIZE)),
        FieldDescriptor::optional("scan_depth", 3, FieldType::Message(&SIZE)),
        FieldDescriptor::optional("scan_threshold", 4, FieldType::Float),
        FieldDescriptor::optional("intensity", 5, FieldType::UInt32),
        FieldDescriptor::repeated("exclude", 6, FieldType::Message(&RECTANGLE)),
        FieldDescriptor::packed("scan_direction", 7, FieldType::Enum(&DIRECTION)),
    ],
};

pub static NOISEFILTER_PARAMETERS: MessageDescriptor = MessageDescriptor {
    name: "NoisefilterParameters",
    fields: &[FieldDescriptor::optional("intensity", 1, FieldType::UInt64)],
};

pub static BLURFILTER_PARAMETERS: MessageDescriptor = MessageDescriptor {
    name: "BlurfilterParameters",
    fields: &[
        FieldDescriptor::optional("scan_size", 1, FieldType::Message(&SIZE)),
        FieldDescriptor::optional("scan_step", 2, FieldType::Message(&SIZE)),
        FieldDescriptor::optional("intensity", 3, FieldType::Float),
    ],
};

pub static GRAYFILTER_PARAMETERS: MessageDescriptor = MessageDescriptor {
    name: "GrayfilterParameters",
    fields: &[
        FieldDescriptor::optional("scan_size", 1, FieldType::Message(&SIZE)),
        FieldDescriptor::optional("scan_step", 2, FieldType::Message(&SIZE)),
        FieldDescriptor::optional("threshold", 3, FieldType::Float),
    ],
};

/// Angles are in degrees
pub static DESKEW_PARAMETERS: MessageDescriptor = MessageDescriptor {
    name: "DeskewParameters",
    fields: &[
        FieldDescriptor::optional("scan_range", 1, FieldType::Float),
        FieldDescriptor::optional("scan_step", 2, FieldType::Float),
        FieldDescriptor::optional("scan_deviation", 3, FieldType::Float),
        FieldDescriptor::optional("scan_size", 4, FieldType::UInt32),
        FieldDescriptor::optional("scan_depth", 5, FieldType::Float),
        FieldDescriptor::packed("scan_edge", 6, FieldType::Enum(&DIRECTION)),
    ],
};

pub static JOB_PARAMETERS: MessageDescriptor = MessageDescriptor {
    name: "JobParameters",
    fields: &[
        FieldDescriptor::optional("layout", 1, FieldType::Enum(&LAYOUT)),
        FieldDescriptor::optional("start_sheet", 2, FieldType::Int32),
        FieldDescriptor::optional("end_sheet", 3, FieldType::Int32),
        FieldDescriptor::optional("start_input", 4, FieldType::Int32),
        FieldDescriptor::optional("start_output", 5, FieldType::Int32),
        FieldDescriptor::optional("input_count", 6, FieldType::Int32),
        FieldDescriptor::optional("output_count", 7, FieldType::Int32),
        FieldDescriptor::optional("sheet_multi_index", 8, FieldType::Message(&MULTI_INDEX)),
        FieldDescriptor::optional("exclude_multi_index", 9, FieldType::Message(&MULTI_INDEX)),
        FieldDescriptor::optional("ignore_multi_index", 10, FieldType::Message(&MULTI_INDEX)),
        FieldDescriptor::optional("insert_blank", 11, FieldType::Message(&MULTI_INDEX)),
        FieldDescriptor::optional("replace_blank", 12, FieldType::Message(&MULTI_INDEX)),
        FieldDescriptor::optional("black_threshold", 13, FieldType::Float),
        FieldDescriptor::optional("white_threshold", 14, FieldType::Float),
        FieldDescriptor::optional(
            "blackfilter",
            15,
            FieldType::Message(&BLACKFILTER_PARAMETERS),
        ),
        FieldDescriptor::optional(
            "noisefilter",
            16,
            FieldType::Message(&NOISEFILTER_PARAMETERS),
        ),
        FieldDescriptor::optional(
            "blurfilter",
            17,
            FieldType::Message(&BLURFILTER_PARAMETERS),
        ),
        FieldDescriptor::optional(
            "grayfilter",
            18,
            FieldType::Message(&GRAYFILTER_PARAMETERS),
        ),
        FieldDescriptor::optional("deskew", 19, FieldType::Message(&DESKEW_PARAMETERS)),
        FieldDescriptor::optional("interpolation", 20, FieldType::Enum(&INTERPOLATION)),
        FieldDescriptor::repeated("wipe", 21, FieldType::Message(&RECTANGLE)),
        FieldDescriptor::repeated("pre_wipe", 22, FieldType::Message(&RECTANGLE)),
        FieldDescriptor::repeated("mask", 23, FieldType::Message(&RECTANGLE)),
        FieldDescriptor::repeated("mask_scan_point", 24, FieldType::Message(&POINT)),
        FieldDescriptor::optional("border", 25, FieldType::Message(&BORDER)),
        FieldDescriptor::optional("pre_border", 26, FieldType::Message(&BORDER)),
        FieldDescriptor::optional("overwrite", 27, FieldType::Bool),
        FieldDescriptor::optional("dpi", 28, FieldType::UInt32),
        FieldDescriptor::optional("pre_rotate", 29, FieldType::SInt32),
        FieldDescriptor::optional("post_rotate", 30, FieldType::SInt32),
        FieldDescriptor::optional("background_color", 31, FieldType::Fixed32),
        FieldDescriptor::optional("output_pixel_format", 32, FieldType::String),
        FieldDescriptor::optional(
            "no_blackfilter_multi_index",
            40,
            FieldType::Message(&MULTI_INDEX),
        ),
        FieldDescriptor::optional(
            "no_noisefilter_multi_index",
            41,
            FieldType::Message(&MULTI_INDEX),
        ),
        FieldDescriptor::optional(
            "no_blurfilter_multi_index",
            42,
            FieldType::Message(&MULTI_INDEX),
        ),
        FieldDescriptor::optional(
            "no_grayfilter_multi_index",
            43,
            FieldType::Message(&MULTI_INDEX),
        ),
        FieldDescriptor::optional(
            "no_mask_scan_multi_index",
            44,
            FieldType::Message(&MULTI_INDEX),
        ),
        FieldDescriptor::optional(
            "no_mask_center_multi_index",
            45,
            FieldType::Message(&MULTI_INDEX),
        ),
        FieldDescriptor::optional(
            "no_deskew_multi_index",
            46,
            FieldType::Message(&MULTI_INDEX),
        ),
        FieldDescriptor::optional("no_wipe_multi_index", 47, FieldType::Message(&MULTI_INDEX)),
        FieldDescriptor::optional(
            "no_border_multi_index",
            48,
            FieldType::Message(&MULTI_INDEX),
        ),
        FieldDescriptor::optional(
            "no_border_scan_multi_index",
            49,
            FieldType::Message(&MULTI_INDEX),
        ),
        FieldDescriptor::optional(
            "no_border_align_multi_index",
            50,
            FieldType::Message(&MULTI_INDEX),
        ),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn check_unique(desc: &MessageDescriptor) {
        let mut names = HashSet::new();
        let mut numbers = HashSet::new();
        for field in desc.fields {
            assert!(names.insert(field.name), "{}.{} declared twice", desc.name, field.name);
            assert!(
                numbers.insert(field.number),
                "{} reuses field number {}",
                desc.name,
                field.number
            );
            assert!(field.number > 0 && field.number < (1 << 29));
        }
    }

    #[test]
    fn test_field_names_and_numbers_unique() {
        for desc in [
            &JOB_PARAMETERS,
            &POINT,
            &RECTANGLE,
            &SIZE,
            &BORDER,
            &MULTI_INDEX,
            &BLACKFILTER_PARAMETERS,
            &NOISEFILTER_PARAMETERS,
            &BLURFILTER_PARAMETERS,
            &GRAYFILTER_PARAMETERS,
            &DESKEW_PARAMETERS,
        ] {
            check_unique(desc);
        }
    }

    #[test]
    fn test_layout_first_field() {
        let layout = JOB_PARAMETERS.field_by_number(1).unwrap();
        assert_eq!(layout.name, "layout");
        assert!(matches!(layout.ty, FieldType::Enum(e) if e.name == "Layout"));
    }

    #[test]
    fn test_multi_index_is_packed() {
        assert!(MULTI_INDEX.field_by_name("index").unwrap().is_packed());
    }
}
