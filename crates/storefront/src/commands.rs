//! Non-interactive subcommands: `list` and `check`.

use std::io::Write;

use address_form::{AddressField, AddressFormController, FormOutcome};
use color_eyre::Result;
use serde_json::json;

use crate::{
    cli::CheckArgs,
    components::address_list::EMPTY_MESSAGE,
    services::{AddressApi, StoredAddress},
};

/// Exit code of `check` when the address is rejected.
pub const REJECTED_EXIT_CODE: i32 = 2;

pub async fn list(api: &dyn AddressApi, json: bool, out: &mut impl Write) -> Result<()> {
    let items = api.list().await?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &items)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_list(&items))?;
    }
    Ok(())
}

/// Plain-text listing, one block per address.
pub fn render_list(items: &[StoredAddress]) -> String {
    if items.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }
    let mut text = String::new();
    for address in items {
        let badge = if address.is_default { " [기본]" } else { "" };
        text.push_str(&format!(
            "#{} {}{}\n    {}\n    ({}) {} {}\n",
            address.id,
            address.receiver_name(),
            badge,
            address.phone,
            address.zipcode,
            address.address1,
            address.address2,
        ));
    }
    text
}

/// Run the values through the form as if typed, then submit.
///
/// Returns the process exit code: 0 when accepted, `REJECTED_EXIT_CODE` otherwise.
pub fn check(args: &CheckArgs, out: &mut impl Write) -> Result<i32> {
    let raw = args.raw_values();
    let mut form = AddressFormController::new();
    for field in AddressField::ORDER {
        form.set_field(field, raw.get(field));
    }

    match form.submit() {
        FormOutcome::Submitted(dto) => {
            if args.json {
                serde_json::to_writer_pretty(&mut *out, &json!({ "ok": true, "address": dto }))?;
                writeln!(out)?;
            } else {
                writeln!(out, "OK")?;
                for field in AddressField::ORDER {
                    writeln!(out, "  {}: {}", field.label(), dto_value(&dto, field))?;
                }
            }
            Ok(0)
        }
        FormOutcome::Rejected { .. } => {
            let errors = form.errors();
            if args.json {
                serde_json::to_writer_pretty(&mut *out, &json!({ "ok": false, "errors": errors }))?;
                writeln!(out)?;
            } else {
                for (field, kind) in errors.iter() {
                    writeln!(out, "{}: {}", field.key(), kind.message(field))?;
                }
            }
            Ok(REJECTED_EXIT_CODE)
        }
        FormOutcome::Cancelled => Ok(REJECTED_EXIT_CODE),
    }
}

fn dto_value(dto: &address_form::AddressDto, field: AddressField) -> &str {
    match field {
        AddressField::Name => &dto.name,
        AddressField::Phone => &dto.phone,
        AddressField::Zipcode => &dto.zipcode,
        AddressField::Address1 => &dto.address1,
        AddressField::Address2 => &dto.address2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::address_book::fake::FakeAddressApi;
    use pretty_assertions::assert_eq;

    fn args() -> CheckArgs {
        CheckArgs {
            name: " 김철수 ".into(),
            phone: "010 1234 5678".into(),
            zipcode: "12-345".into(),
            address1: "서울시 강남구".into(),
            address2: "101동".into(),
            json: false,
        }
    }

    #[test]
    fn accepted_address_prints_normalized_values() {
        let mut out = Vec::new();
        assert_eq!(check(&args(), &mut out).unwrap(), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("OK\n"));
        assert!(text.contains("01012345678"));
        assert!(text.contains("12345"));
    }

    #[test]
    fn rejected_address_lists_errors_in_field_order() {
        let mut out = Vec::new();
        let args = CheckArgs {
            phone: "123".into(),
            address2: String::new(),
            json: true,
            ..args()
        };
        assert_eq!(check(&args, &mut out).unwrap(), REJECTED_EXIT_CODE);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["ok"], false);
        let keys: Vec<&str> = value["errors"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert!(keys.contains(&"phone"));
        assert!(keys.contains(&"address2"));
        assert!(!keys.contains(&"name"));
    }

    #[test]
    fn listing_marks_the_default_address() {
        let items = vec![
            StoredAddress {
                id: 7,
                name: "김철수".into(),
                phone: "010-1234-5678".into(),
                zipcode: "12345".into(),
                address1: "서울시".into(),
                address2: "1동".into(),
                is_default: true,
                ..Default::default()
            },
            StoredAddress {
                id: 8,
                receiver: Some("홍길동".into()),
                ..Default::default()
            },
        ];
        let text = render_list(&items);
        assert!(text.starts_with("#7 김철수 [기본]\n"));
        assert!(text.contains("#8 홍길동\n"));
        assert_eq!(render_list(&[]), format!("{EMPTY_MESSAGE}\n"));
    }

    #[tokio::test]
    async fn list_as_json() {
        let api = FakeAddressApi::with_items(vec![StoredAddress {
            id: 1,
            name: "김철수".into(),
            ..Default::default()
        }]);
        let mut out = Vec::new();
        list(&api, true, &mut out).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["isDefault"], false);
    }
}
