//! Declaration of options and resolution of declarations into descriptors.

use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::fmt::{Display, Formatter};

use crate::value::Slot;
use crate::{ConfigError, ConversionError, OptionValue, ValueKind};

/// The prefix of a long option name.
pub const LONG_PREFIX: &str = "--";
/// The prefix of a short option alias.
pub const SHORT_PREFIX: &str = "-";

//////////////////////////////////////////// OptionSpec ////////////////////////////////////////////

/// OptionSpec is what a field declares about the option bound to it.  Names are given without
/// their dashes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OptionSpec {
    /// The long name; rendered as `--name`.  Must not be empty.
    pub name: String,
    /// The short alias; rendered as `-alias`.  Empty means no alias.
    pub alias: String,
    /// The placeholder shown for the value in one-line usage.  Empty means the field name.
    pub meta_name: String,
    /// The description shown in multi-line usage.
    pub usage: String,
    /// Whether the option must appear on the command line.
    pub required: bool,
}

impl OptionSpec {
    /// An optional option named `name` with no alias.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn meta_name(mut self, meta_name: impl Into<String>) -> Self {
        self.meta_name = meta_name.into();
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/////////////////////////////////////////// ArgumentsSpec //////////////////////////////////////////

/// ArgumentsSpec is what a field declares about the positional arguments it collects.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ArgumentsSpec {
    /// The placeholder for the arguments.  Empty means the field name.
    pub meta_name: String,
    /// Whether at least one positional argument must be collected.
    pub required: bool,
}

impl ArgumentsSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta_name(mut self, meta_name: impl Into<String>) -> Self {
        self.meta_name = meta_name.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/////////////////////////////////////////// ArgumentsSink //////////////////////////////////////////

/// ArgumentsSink is implemented by the collections a field can use to collect positional
/// arguments.  `Option<C>` is an unallocated collection:  it becomes `Some` on first use, or at
/// the end of a successful parse.
///
/// A field that is not such a collection does not compile:
///
/// ```compile_fail,E0277
/// #[derive(Default, bindarg_derive::Bind)]
/// struct Single {
///     #[bindarg(arguments)]
///     x: String,
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "arguments type must be a collection of String, found {Self}",
    note = "use Vec, VecDeque, LinkedList, BTreeSet or HashSet of String, or an Option of one"
)]
pub trait ArgumentsSink {
    /// Append one positional argument.
    fn push_arg(&mut self, arg: String);
    /// True if the collection holds anything, including values it held before parsing.
    fn has_args(&self) -> bool;
    /// Make sure the collection exists.
    fn allocate(&mut self) {}
}

macro_rules! arguments_sink {
    ($ty:ty, $push:ident) => {
        impl ArgumentsSink for $ty {
            fn push_arg(&mut self, arg: String) {
                self.$push(arg);
            }

            fn has_args(&self) -> bool {
                !self.is_empty()
            }
        }
    };
}

arguments_sink!(Vec<String>, push);
arguments_sink!(VecDeque<String>, push_back);
arguments_sink!(LinkedList<String>, push_back);
arguments_sink!(BTreeSet<String>, insert);
arguments_sink!(HashSet<String>, insert);

impl<C: ArgumentsSink + Default> ArgumentsSink for Option<C> {
    fn push_arg(&mut self, arg: String) {
        self.get_or_insert_with(C::default).push_arg(arg);
    }

    fn has_args(&self) -> bool {
        self.as_ref().map(C::has_args).unwrap_or(false)
    }

    fn allocate(&mut self) {
        self.get_or_insert_with(C::default);
    }
}

//////////////////////////////////////////// OptionInfo ////////////////////////////////////////////

/// OptionInfo is the resolved, immutable metadata of one option.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptionInfo {
    field: &'static str,
    name: String,
    alias: String,
    meta_name: String,
    usage: String,
    required: bool,
    kind: ValueKind,
}

impl OptionInfo {
    fn new(field: &'static str, spec: OptionSpec, kind: ValueKind) -> Self {
        let alias = if spec.alias.is_empty() {
            String::new()
        } else {
            format!("{}{}", SHORT_PREFIX, spec.alias)
        };
        let meta_name = if spec.meta_name.is_empty() {
            field.to_string()
        } else {
            spec.meta_name
        };
        Self {
            field,
            name: format!("{}{}", LONG_PREFIX, spec.name),
            alias,
            meta_name,
            usage: spec.usage,
            required: spec.required,
            kind,
        }
    }

    /// The name of the bound field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The long name including its prefix, e.g. `--integer`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alias including its prefix, e.g. `-i`, or `None`.
    pub fn alias(&self) -> Option<&str> {
        if self.alias.is_empty() {
            None
        } else {
            Some(&self.alias)
        }
    }

    pub fn meta_name(&self) -> &str {
        &self.meta_name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// True if `token` is exactly this option's long name or alias.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || (!self.alias.is_empty() && self.alias == token)
    }
}

impl Display for OptionInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.alias() {
            Some(alias) => write!(f, "{}/{}", alias, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/////////////////////////////////////////// ArgumentsInfo //////////////////////////////////////////

/// ArgumentsInfo is the resolved metadata of the positional-argument sink.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArgumentsInfo {
    field: &'static str,
    meta_name: String,
    required: bool,
}

impl ArgumentsInfo {
    fn new(field: &'static str, spec: ArgumentsSpec) -> Self {
        let meta_name = if spec.meta_name.is_empty() {
            field.to_string()
        } else {
            spec.meta_name
        };
        Self {
            field,
            meta_name,
            required: spec.required,
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn meta_name(&self) -> &str {
        &self.meta_name
    }

    pub fn required(&self) -> bool {
        self.required
    }
}

//////////////////////////////////////////// descriptors ///////////////////////////////////////////

/// OptionDescriptor pairs an option's metadata with the field it stores into.
pub struct OptionDescriptor<'a> {
    info: OptionInfo,
    slot: &'a mut dyn Slot,
}

impl<'a> OptionDescriptor<'a> {
    pub fn info(&self) -> &OptionInfo {
        &self.info
    }

    /// Convert `value` and store it in the bound field.
    pub fn assign(&mut self, value: &str) -> Result<(), ConversionError> {
        self.slot.assign(value)
    }
}

/// ArgumentsDescriptor pairs the positional sink's metadata with the collection it appends to.
pub struct ArgumentsDescriptor<'a> {
    info: ArgumentsInfo,
    sink: &'a mut dyn ArgumentsSink,
}

impl<'a> ArgumentsDescriptor<'a> {
    pub fn info(&self) -> &ArgumentsInfo {
        &self.info
    }

    pub fn push(&mut self, arg: &str) {
        self.sink.push_arg(arg.to_string());
    }

    pub fn has_args(&self) -> bool {
        self.sink.has_args()
    }

    pub fn allocate(&mut self) {
        self.sink.allocate();
    }
}

//////////////////////////////////////////////// Bind //////////////////////////////////////////////

/// Bind is implemented by any type whose fields receive command-line options.  Implementations
/// hand each bound field to the binder in declaration order; `#[derive(Bind)]` writes this for
/// you.
pub trait Bind {
    fn bind<'a>(&'a mut self, binder: &mut Binder<'a>);

    /// Parse `args` into a default-constructed `Self`.
    fn from_arguments<S: AsRef<str>>(args: &[S]) -> Result<Self, crate::Error>
    where
        Self: Default + Sized,
    {
        let mut target = Self::default();
        crate::ArgumentProcessor::new().parse(&mut target, args)?;
        Ok(target)
    }

    /// Parse the process's arguments into `Self`.  On bad input this prints `usage`, the error,
    /// and the option table to stderr and exits.
    fn from_command_line(usage: &str) -> Self
    where
        Self: Default + Sized,
    {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut target = Self::default();
        let mut processor = crate::ArgumentProcessor::new();
        match processor.parse(&mut target, &args) {
            Ok(_) => target,
            Err(crate::Error::Config(err)) => {
                panic!("invalid option declarations: {}", err);
            }
            Err(crate::Error::Parse(err)) => {
                eprintln!("{}", usage);
                eprintln!("{}", err);
                eprintln!("{}", processor.usage());
                std::process::exit(1);
            }
        }
    }
}

////////////////////////////////////////////// Binder //////////////////////////////////////////////

/// Binder collects the declarations of one target and resolves them into descriptors.
#[derive(Default)]
pub struct Binder<'a> {
    options: Vec<OptionDescriptor<'a>>,
    arguments: Option<ArgumentsDescriptor<'a>>,
}

impl<'a> Binder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `slot` receives the option described by `spec`.
    pub fn option<T: OptionValue>(
        &mut self,
        field: &'static str,
        spec: OptionSpec,
        slot: &'a mut T,
    ) {
        let info = OptionInfo::new(field, spec, T::KIND);
        self.options.push(OptionDescriptor { info, slot });
    }

    /// Declare that `sink` collects positional arguments.  A later declaration replaces an
    /// earlier one.
    pub fn arguments<S: ArgumentsSink>(
        &mut self,
        field: &'static str,
        spec: ArgumentsSpec,
        sink: &'a mut S,
    ) {
        let info = ArgumentsInfo::new(field, spec);
        self.arguments = Some(ArgumentsDescriptor { info, sink });
    }

    /// Append the declarations of `target` after the ones made so far.
    pub fn nested<B: Bind + ?Sized>(&mut self, target: &'a mut B) {
        target.bind(self);
    }

    /// Validate the declarations and produce the descriptor set.
    pub fn resolve(self) -> Result<Resolution<'a>, ConfigError> {
        let mut names = HashSet::new();
        let mut aliases = HashSet::new();
        let mut options = Vec::with_capacity(self.options.len());
        for descriptor in self.options {
            let info = &descriptor.info;
            if info.name == LONG_PREFIX {
                return Err(ConfigError::MissingName { field: info.field });
            }
            if names.contains(&info.name)
                || (!info.alias.is_empty() && aliases.contains(&info.alias))
            {
                return Err(ConfigError::Duplicate {
                    name: info.name.clone(),
                    alias: info.alias.clone(),
                });
            }
            names.insert(info.name.clone());
            aliases.insert(info.alias.clone());
            options.push(descriptor);
        }
        tracing::debug!(
            options = options.len(),
            arguments = self.arguments.is_some(),
            "resolved option descriptors"
        );
        Ok(Resolution {
            options,
            arguments: self.arguments,
        })
    }
}

//////////////////////////////////////////// Resolution ////////////////////////////////////////////

/// Resolution is the validated descriptor set of one target.
pub struct Resolution<'a> {
    options: Vec<OptionDescriptor<'a>>,
    arguments: Option<ArgumentsDescriptor<'a>>,
}

impl<'a> Resolution<'a> {
    /// Bind `target` and resolve its declarations.
    pub fn of<B: Bind + ?Sized>(target: &'a mut B) -> Result<Self, ConfigError> {
        let mut binder = Binder::new();
        target.bind(&mut binder);
        binder.resolve()
    }

    pub fn options(&self) -> &[OptionDescriptor<'a>] {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut [OptionDescriptor<'a>] {
        &mut self.options
    }

    pub fn arguments(&self) -> Option<&ArgumentsDescriptor<'a>> {
        self.arguments.as_ref()
    }

    pub fn arguments_mut(&mut self) -> Option<&mut ArgumentsDescriptor<'a>> {
        self.arguments.as_mut()
    }

    /// Copy out the metadata of every option, in declaration order.
    pub fn option_infos(&self) -> Vec<OptionInfo> {
        self.options.iter().map(|o| o.info.clone()).collect()
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Base {
        verbose: bool,
        rest: Vec<String>,
    }

    impl Bind for Base {
        fn bind<'a>(&'a mut self, binder: &mut Binder<'a>) {
            binder.option("verbose", OptionSpec::new("verbose").alias("v"), &mut self.verbose);
            binder.arguments("rest", ArgumentsSpec::new(), &mut self.rest);
        }
    }

    #[derive(Default)]
    struct Derived {
        count: Option<i64>,
        files: Option<Vec<String>>,
        base: Base,
    }

    impl Bind for Derived {
        fn bind<'a>(&'a mut self, binder: &mut Binder<'a>) {
            binder.option(
                "count",
                OptionSpec::new("count").alias("c").required(),
                &mut self.count,
            );
            binder.arguments("files", ArgumentsSpec::new().meta_name("FILE"), &mut self.files);
            binder.nested(&mut self.base);
        }
    }

    struct Pair {
        a: String,
        b: String,
        a_spec: OptionSpec,
        b_spec: OptionSpec,
    }

    impl Bind for Pair {
        fn bind<'a>(&'a mut self, binder: &mut Binder<'a>) {
            binder.option("a", self.a_spec.clone(), &mut self.a);
            binder.option("b", self.b_spec.clone(), &mut self.b);
        }
    }

    fn pair(a_spec: OptionSpec, b_spec: OptionSpec) -> Pair {
        Pair {
            a: String::new(),
            b: String::new(),
            a_spec,
            b_spec,
        }
    }

    #[test]
    fn nested_comes_last() {
        let mut target = Derived::default();
        let resolution = Resolution::of(&mut target).unwrap();
        let names: Vec<&str> = resolution.options().iter().map(|o| o.info().name()).collect();
        assert_eq!(vec!["--count", "--verbose"], names);
        // The nested arguments declaration came last, so it wins.
        assert_eq!("rest", resolution.arguments().unwrap().info().field());
    }

    #[test]
    fn info_rendering() {
        let mut target = Derived::default();
        let resolution = Resolution::of(&mut target).unwrap();
        let count = resolution.options()[0].info();
        assert_eq!("-c/--count", count.to_string());
        assert_eq!(Some("-c"), count.alias());
        assert_eq!("count", count.meta_name());
        assert_eq!(ValueKind::Long, count.kind());
        assert!(count.required());
        assert!(count.matches("-c"));
        assert!(count.matches("--count"));
        assert!(!count.matches("--c"));
        assert!(!count.matches("-count"));
    }

    #[test]
    fn no_alias_never_matches_bare_dash() {
        let mut target = pair(OptionSpec::new("hoge"), OptionSpec::new("fuga").alias("f"));
        let resolution = Resolution::of(&mut target).unwrap();
        let hoge = resolution.options()[0].info();
        assert_eq!("--hoge", hoge.to_string());
        assert_eq!(None, hoge.alias());
        assert!(!hoge.matches("-"));
        assert!(!hoge.matches(""));
    }

    #[test]
    fn missing_name() {
        let mut target = pair(OptionSpec::new(""), OptionSpec::new("b"));
        match Resolution::of(&mut target) {
            Err(err) => assert_eq!(ConfigError::MissingName { field: "a" }, err),
            Ok(_) => panic!("empty name must not resolve"),
        }
    }

    #[test]
    fn duplicate_name() {
        let mut target = pair(
            OptionSpec::new("n").alias("aa"),
            OptionSpec::new("n").alias("ab"),
        );
        match Resolution::of(&mut target) {
            Err(err) => assert_eq!("name [--n] or alias [-ab] is duplicated.", err.to_string()),
            Ok(_) => panic!("duplicate name must not resolve"),
        }
    }

    #[test]
    fn duplicate_alias() {
        let mut target = pair(
            OptionSpec::new("n0").alias("a"),
            OptionSpec::new("n1").alias("a"),
        );
        match Resolution::of(&mut target) {
            Err(err) => assert_eq!("name [--n1] or alias [-a] is duplicated.", err.to_string()),
            Ok(_) => panic!("duplicate alias must not resolve"),
        }
    }

    #[test]
    fn missing_aliases_do_not_collide() {
        let mut target = pair(OptionSpec::new("a"), OptionSpec::new("b"));
        assert!(Resolution::of(&mut target).is_ok());
    }

    #[test]
    fn lazy_sink() {
        let mut sink: Option<LinkedList<String>> = None;
        assert!(!sink.has_args());
        sink.allocate();
        assert_eq!(Some(LinkedList::new()), sink);
        sink.push_arg("x".to_string());
        assert!(sink.has_args());
    }

    #[test]
    fn set_sinks_dedupe() {
        let mut sink: BTreeSet<String> = BTreeSet::new();
        sink.push_arg("x".to_string());
        sink.push_arg("x".to_string());
        assert_eq!(1, sink.len());
    }
}
