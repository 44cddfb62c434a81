//! Rendering of option tables.  Both forms are pure functions of the resolved options.

use crate::OptionInfo;

const HEADER: &str = "available options :";
// Width of an alias column entry like "-s, ", used to pad options without an alias.
const NO_ALIAS: &str = "    ";

/// Render every option on one line, e.g.
/// `available options : [-s/--string str] -i/--integer int`.  Optional options are bracketed.
pub fn one_line(options: &[OptionInfo]) -> String {
    let mut usage = String::from(HEADER);
    for option in options {
        usage.push(' ');
        if option.required() {
            usage += &format!("{} {}", option, option.meta_name());
        } else {
            usage += &format!("[{} {}]", option, option.meta_name());
        }
    }
    usage
}

/// Render one option per line, e.g.
///
/// ```text
/// available options :
///  -s, --string : string option.
///      --hoge : some option. (required)
/// ```
pub fn multi_line(options: &[OptionInfo]) -> String {
    let mut lines = vec![HEADER.to_string()];
    for option in options {
        let alias = match option.alias() {
            Some(alias) => format!("{}, ", alias),
            None => NO_ALIAS.to_string(),
        };
        let mut line = format!(" {}{} : {}", alias, option.name(), option.usage());
        if option.required() {
            line += " (required)";
        }
        lines.push(line);
    }
    lines.join("\n")
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArgumentsSpec, Bind, Binder, OptionSpec, Resolution};

    #[derive(Default)]
    struct Sample {
        string: String,
        integer: i32,
        hoge: Option<f64>,
        args: Vec<String>,
    }

    impl Bind for Sample {
        fn bind<'a>(&'a mut self, binder: &mut Binder<'a>) {
            binder.option(
                "string",
                OptionSpec::new("string")
                    .alias("s")
                    .meta_name("str")
                    .usage("string option."),
                &mut self.string,
            );
            binder.option(
                "integer",
                OptionSpec::new("integer")
                    .alias("i")
                    .usage("integer option.")
                    .required(),
                &mut self.integer,
            );
            binder.option("hoge", OptionSpec::new("hoge"), &mut self.hoge);
            binder.arguments("args", ArgumentsSpec::new(), &mut self.args);
        }
    }

    fn infos() -> Vec<OptionInfo> {
        let mut sample = Sample::default();
        let resolution = Resolution::of(&mut sample).unwrap();
        resolution.option_infos()
    }

    #[test]
    fn one_line_form() {
        assert_eq!(
            "available options : [-s/--string str] -i/--integer integer [--hoge hoge]",
            one_line(&infos())
        );
    }

    #[test]
    fn multi_line_form() {
        assert_eq!(
            "available options :\n".to_string()
                + " -s, --string : string option.\n"
                + " -i, --integer : integer option. (required)\n"
                + "     --hoge : ",
            multi_line(&infos())
        );
    }

    #[test]
    fn empty() {
        assert_eq!("available options :", one_line(&[]));
        assert_eq!("available options :", multi_line(&[]));
    }

    #[test]
    fn idempotent() {
        let infos = infos();
        assert_eq!(one_line(&infos), one_line(&infos));
        assert_eq!(multi_line(&infos), multi_line(&infos));
    }
}
