use fieldcheck_validate_derive::Validate;

#[derive(Validate)]
struct Renamed {
    #[validate(nullable_not_blank)]
    title: Option<String>,
    #[validate(field = "title", nullable_not_blank)]
    heading: Option<String>,
}

fn main() {}
