use fieldcheck_validate_derive::Validate;

#[derive(Validate)]
struct Note {
    #[validate(nullable_not_blank(message = "{field must have content"))]
    text: Option<String>,
}

fn main() {}
