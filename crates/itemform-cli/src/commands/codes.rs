use colored::Colorize;
use itemform::Config;

pub fn execute(config: &Config, code: &str, object: &str, field: Option<&str>, type_name: &str) {
    let resolver = config.resolver();
    let codes = match field {
        Some(field) => resolver.resolve_field_codes(code, object, field, type_name),
        None => resolver.resolve_object_codes(code, object),
    };
    let messages = config.messages();

    for (rank, key) in codes.iter().enumerate() {
        match messages.get(key) {
            Some(template) => println!("{}. {}  {}", rank + 1, key.cyan(), template.dimmed()),
            None => println!("{}. {}", rank + 1, key),
        }
    }
}
