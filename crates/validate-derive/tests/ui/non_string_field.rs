use fieldcheck_validate_derive::Validate;

#[derive(Validate)]
struct Counter {
    #[validate(nullable_not_blank)]
    count: Option<u32>,
}

fn main() {}
