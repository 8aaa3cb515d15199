// src/pages/file.rs
//! <https://developers.notion.com/reference/file-object>
//!
//! `File` is adaptive on `type`: a Notion-hosted file carries a `file`
//! object, an external one an `external` object.

use super::doc_text::{first_sentence, parameter_field};
use super::emoji::FILE_OR_EMOJI;
use crate::element::local::LocalCopy;
use crate::element::Parameter;
use crate::symbols::{AdaptiveObject, ConcreteObject, Field, TypeRef};

pub fn local_copy() -> LocalCopy {
    LocalCopy::new("file", "file-object")
        .paragraph("File objects contain data about a file that is uploaded to Notion, or data about an external file that is linked to in Notion.")
        .on_text(|text, b| {
            b.add_adaptive("File", "type", first_sentence(text))?;
            b.add_union_to_global_if_not_exists(FILE_OR_EMOJI, "type")?;
            b.add_union_member(FILE_OR_EMOJI, "File")
        })
        .paragraph("Page, embed, image, video, file, pdf, and bookmark block types all contain file objects. Icon and cover page object values also contain file objects.")
        .paragraph("Each file object includes the following fields:")
        .parameter(Parameter::new(
            "`type`",
            "`string` (enum)",
            "The type of the file object. Possible type values are: `\"external\"`, `\"file\"`.",
            "`\"external\"`",
        ))
        .on_parameter(|p, b| {
            b.get_mut::<AdaptiveObject>("File")?.add_field(parameter_field(p)?)?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`external` | `file`",
            "`object`",
            "An object containing type-specific configuration. The key of the object is `external` for external files, and `file` for Notion-hosted files.",
            "Refer to the type sections below for details on type-specific values.",
        ))
        .api_header("Notion-hosted files")
        .paragraph("All Notion-hosted files have a `type` of `\"file\"`. The corresponding file specific object contains the following fields:")
        .on_text(|text, b| {
            b.add_concrete("NotionHostedFile", "A file uploaded to Notion.")?;
            b.get_mut::<AdaptiveObject>("File")?.add_tagged_field(
                "file",
                Field::new("file", TypeRef::named("NotionHostedFile"), first_sentence(text)),
            )?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`url`",
            "`string`",
            "An authenticated S3 URL to the file. The URL is valid for one hour. If the link expires, then you can send an API request to get an updated URL.",
            "`\"https://s3.us-west-2.amazonaws.com/secure.notion-static.com/9bc6c6e0-32b8-4d55-8c12-3ae931f43a01/brocolli.jpeg?...\"`",
        ))
        .on_parameter(|p, b| {
            b.get_mut::<ConcreteObject>("NotionHostedFile")?.add_field(parameter_field(p)?)?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`expiry_time`",
            "`string` (ISO 8601 date time)",
            "The date and time when the link expires, formatted as an ISO 8601 date time string.",
            "`\"2020-03-17T19:10:04.968Z\"`",
        ))
        .on_parameter(|p, b| {
            b.get_mut::<ConcreteObject>("NotionHostedFile")?.add_field(parameter_field(p)?)?;
            Ok(())
        })
        .paragraph("Example Notion-hosted file object")
        .json("{\n  \"type\": \"file\",\n  \"file\": {\n    \"url\": \"https://s3.us-west-2.amazonaws.com/secure.notion-static.com/7b8b0713-dbd4-4962-b38b-955b6c49a573/My_test_image.png\",\n    \"expiry_time\": \"2024-04-04T10:45:54.308Z\"\n  }\n}")
        .on_code(|block, b| {
            b.add_unmarshal_examples("File", block);
            Ok(())
        })
        .api_header("External files")
        .paragraph("An external file is any URL linked to in Notion that isn’t hosted by Notion. All external files have a `type` of `\"external\"`. The corresponding file specific object contains the following fields:")
        .on_text(|text, b| {
            b.add_concrete("ExternalFile", first_sentence(text))?;
            b.get_mut::<AdaptiveObject>("File")?.add_tagged_field(
                "external",
                Field::new("external", TypeRef::named("ExternalFile"), "Link to the externally hosted content."),
            )?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`url`",
            "`string`",
            "A link to the externally hosted content.",
            "`\"https://website.domain/files/doc.txt\"`",
        ))
        .on_parameter(|p, b| {
            b.get_mut::<ConcreteObject>("ExternalFile")?.add_field(parameter_field(p)?)?;
            Ok(())
        })
        .paragraph("Example external file object")
        .json("{\n  \"type\": \"external\",\n  \"external\": {\n    \"url\": \"https://images.unsplash.com/photo-1525310072745-f49212b5ac6d?ixlib=rb-1.2.1&ixid=MnwxMjA3fDB8MHxwaG90by1wYWdlfHx8fGVufDB8fHx8&auto=format&fit=crop&w=1065&q=80\"\n  }\n}")
        .on_code(|block, b| {
            b.add_unmarshal_examples("File", block);
            Ok(())
        })
}
