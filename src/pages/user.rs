// src/pages/user.rs
//! <https://developers.notion.com/reference/user>
//!
//! People and bots share one adaptive `User`: the `person` and `bot`
//! objects are written only for their own `type`.

use super::doc_text::{first_sentence, normalize_property_name, parameter_field, with_quirk};
use crate::element::local::LocalCopy;
use crate::element::{Code, CodeBlock, Parameter};
use crate::error::AppError;
use crate::symbols::{AdaptiveObject, Builder, ConcreteObject, Field, TypeRef};

const USER: &str = "User";
const PERSON: &str = "Person";

/// Shared user fields. Only starred rows are always present.
fn shared_field(p: &Parameter, b: &mut Builder) -> Result<(), AppError> {
    let field = parameter_field(p)?;
    let field = if p.property.ends_with('*') {
        field
    } else {
        field.omit_when_empty()
    };
    b.get_mut::<AdaptiveObject>(USER)?.add_field(field)?;
    Ok(())
}

pub fn local_copy() -> LocalCopy {
    LocalCopy::new("user", "user")
        .paragraph("The User object represents a user in a Notion workspace. Users include full workspace members, guests, and integrations. You can find more information about members and guests in this [guide](https://www.notion.so/help/add-members-admins-guests-and-groups).")
        .on_text(|text, b| {
            b.add_global_adaptive(USER, "type", first_sentence(text))?;
            Ok(())
        })
        .callout(
            "info",
            "Provisioning users and groups using SCIM",
            "The SCIM API is available for workspaces in Notion's Enterprise Plan. Learn more about [using SCIM with Notion](https://www.notion.so/help/provision-users-and-groups-with-scim).",
        )
        .api_header("Where user objects appear in the API")
        .paragraph("User objects appear in every object's `created_by` and `last_edited_by` properties. Users also appear in the people property value, and in the mention rich text annotation.")
        .api_header("All users")
        .paragraph("These fields are shared by all users, including people and bots. Fields marked with * are always present.")
        .parameter(Parameter::new(
            "`object`*",
            "`\"user\"`",
            "Always \"user\"",
            "`\"user\"`",
        ))
        .on_parameter(shared_field)
        .parameter(Parameter::new(
            "`id`*",
            "`string` (UUID)",
            "Unique identifier for this user.",
            "`\"e79a0b74-3aba-4149-9f74-0bb5791a6ee6\"`",
        ))
        .on_parameter(shared_field)
        .parameter(Parameter::new(
            "`type`",
            "`string` (optional, enum)",
            "Type of the user. Possible values are `\"person\"` and `\"bot\"`.",
            "`\"person\"`",
        ))
        .on_parameter(|p, b| {
            let name = normalize_property_name(&p.property);
            b.get_mut::<AdaptiveObject>(USER)?.add_field(
                Field::new(name, TypeRef::String, first_sentence(&p.description)).omit_when_empty(),
            )?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`name`",
            "`string` (optional)",
            "User's name, as displayed in Notion.",
            "`\"Avocado Lovelace\"`",
        ))
        .on_parameter(shared_field)
        .parameter(Parameter::new(
            "`avatar_url`",
            "`string` (optional)",
            "Chosen avatar image.",
            "`\"https://secure.notion-static.com/e6a352a8-8381-44d0-a1dc-9ed80e62b53d.jpg\"`",
        ))
        .on_parameter(shared_field)
        .api_header("People")
        .paragraph("User objects that represent people have the `type` property set to `\"person\"`. These objects also have the following properties:")
        .on_text(|_, b| {
            b.add_global_concrete(PERSON, "Properties only present for non-bot users.")?;
            b.get_mut::<AdaptiveObject>(USER)?.add_tagged_field(
                "person",
                Field::new("person", TypeRef::named(PERSON), "Properties only present for non-bot users."),
            )?;
            Ok(())
        })
        .parameter(Parameter::new(
            "`person`",
            "`object`",
            "Properties only present for non-bot users.",
            "`{}`",
        ))
        .parameter(Parameter::new(
            "`person.email`",
            "`string`",
            "Email address of person. This is only present if an integration has user capabilities that allow access to email addresses.",
            "`\"avo@example.org\"`",
        ))
        .on_parameter(|p, b| {
            let field = Field::new("email", TypeRef::String, first_sentence(&p.description));
            b.get_mut::<ConcreteObject>(PERSON)?.add_field(field.omit_when_empty())?;
            Ok(())
        })
        .api_header("Bots")
        .paragraph("A user object's `type` property is`\"bot\"` when the user object represents a bot. A bot user object has the following properties:")
        .parameter(Parameter::new(
            "`bot`",
            "`object`",
            "If you're using `GET /v1/users/me` or `GET /v1/users/{{your_bot_id}}`, then this field returns data about the bot, including `owner`, `owner.type`, and `workspace_name`. These properties are detailed below.",
            "`{}`",
        ))
        .on_parameter(|p, b| {
            let comment = with_quirk(&first_sentence(&p.description), "user", "bot");
            b.get_mut::<AdaptiveObject>(USER)?
                .add_tagged_field("bot", Field::new("bot", TypeRef::Json, comment))?;
            Ok(())
        })
        .code_block(CodeBlock::new(vec![
            Code::new(
                "Person",
                "json",
                "{\n  \"object\": \"user\",\n  \"id\": \"d40e767c-d7af-4b18-a86d-55c61f1e39a4\",\n  \"type\": \"person\",\n  \"person\": {\n    \"email\": \"avo@example.org\"\n  },\n  \"name\": \"Avocado Lovelace\",\n  \"avatar_url\": \"https://secure.notion-static.com/e6a352a8-8381-44d0-a1dc-9ed80e62b53d.jpg\"\n}",
            ),
            Code::new(
                "Bot",
                "json",
                "{\n  \"object\": \"user\",\n  \"id\": \"9188c6a5-7381-452f-b3dc-d4865aa89bdf\",\n  \"name\": \"Test Integration\",\n  \"avatar_url\": \"https://s3-us-west-2.amazonaws.com/public.notion-static.com/3db373fe-18f8-4a06-a541-ad7e3fd8f4c6/integration_logo.png\",\n  \"type\": \"bot\",\n  \"bot\": {\n    \"owner\": {\n      \"type\": \"workspace\",\n      \"workspace\": true\n    },\n    \"workspace_name\": \"Ada Lovelace’s Notion\"\n  }\n}",
            ),
        ]))
        .on_code(|block, b| {
            b.add_unmarshal_examples(USER, block);
            Ok(())
        })
}
