use fieldcheck_validate_derive::Validate;

#[derive(Validate)]
#[validate(nullable_not_blank)]
struct Whole {
    title: Option<String>,
}

fn main() {}
