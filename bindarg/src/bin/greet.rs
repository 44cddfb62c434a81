use bindarg::Bind;

#[derive(Debug, bindarg_derive::Bind)]
struct GreetOptions {
    #[bindarg(option, name = "string", alias = "s", usage = "string option.")]
    string: String,
    #[bindarg(option, name = "boolean", alias = "b", usage = "boolean option.")]
    boolean: bool,
    // no alias
    #[bindarg(option, name = "Boolean", meta_name = "Bool", usage = "boolean object option.")]
    bool_object: Option<bool>,
    #[bindarg(option, name = "integer", alias = "i", required, usage = "integer option.")]
    integer: i32,
    #[bindarg(
        option,
        name = "Integer",
        alias = "I",
        meta_name = "Integer",
        usage = "integer object option."
    )]
    int_object: Option<i32>,
    #[bindarg(arguments)]
    args: Option<Vec<String>>,
}

impl Default for GreetOptions {
    fn default() -> Self {
        Self {
            string: "default".to_string(),
            boolean: false,
            bool_object: None,
            integer: 0,
            int_object: None,
            args: None,
        }
    }
}

fn main() {
    let options = GreetOptions::from_command_line("Usage: greet -i <integer> [OPTIONS] [ARGS]");
    println!("{}", options.string);
    println!("{}", options.boolean);
    println!("{:?}", options.bool_object);
    println!("{}", options.integer);
    println!("{:?}", options.int_object);
    println!("{:?}", options.args);
}
