// src/pages/emoji.rs
//! <https://developers.notion.com/reference/emoji-object>

use super::doc_text::{first_sentence, parameter_field};
use crate::element::local::LocalCopy;
use crate::element::Parameter;
use crate::symbols::ConcreteObject;

pub(crate) const FILE_OR_EMOJI: &str = "FileOrEmoji";

pub fn local_copy() -> LocalCopy {
    LocalCopy::new("emoji", "emoji-object")
        .paragraph("An emoji object contains information about an emoji character. It is most often used to represent an emoji that is rendered as a page icon in the Notion UI.")
        .on_text(|text, b| {
            b.add_concrete("Emoji", first_sentence(text))?;
            b.add_union_to_global_if_not_exists(FILE_OR_EMOJI, "type")?.comment =
                "A page or database icon: an uploaded or external file, or an emoji.".to_string();
            b.add_union_member(FILE_OR_EMOJI, "Emoji")
        })
        .json("{\n  \"type\": \"emoji\",\n  \"emoji\": \"😻\"\n}")
        .on_code(|block, b| {
            b.add_unmarshal_examples("Emoji", block);
            Ok(())
        })
        .paragraph("The object contains the following fields:")
        .parameter(Parameter::new(
            "`type`",
            "`\"emoji\"`",
            "The constant string `\"emoji\"` that represents the object type.",
            "`\"emoji\"`",
        ))
        .on_parameter(|p, b| {
            b.get_mut::<ConcreteObject>("Emoji")?.add_field(parameter_field(p)?)?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`emoji`",
            "`string`",
            "The emoji character.",
            "`\"😻\"`",
        ))
        .on_parameter(|p, b| {
            b.get_mut::<ConcreteObject>("Emoji")?.add_field(parameter_field(p)?)?;
            Ok(())
        })
        .paragraph("To use the Notion API to render an emoji object as a page icon, set a page’s icon property field to an emoji object.")
}
