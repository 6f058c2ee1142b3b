//! Compiler flag classification
//!
//! GCC-like drivers share most of their command line grammar. This module
//! does not understand every flag. It knows the ones which decide what kind
//! of call this is, which arguments are inputs, and where the output goes.
//! Everything else is kept as an opaque flag and passed through.

use std::path::Path;

/// What a flag (or a flag with its value) does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    KindOfOutput,
    KindOfOutputNoLinking,
    KindOfOutputInfo,
    KindOfOutputOutput,
    Preprocessor,
    PreprocessorMake,
    Linker,
    LinkerObjectFile,
    DirectorySearch,
    DirectorySearchLinker,
    Source,
    Other,
}

/// A flag together with the values it consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerFlag {
    pub arguments: Vec<String>,
    pub kind: FlagKind,
}

impl CompilerFlag {
    pub fn new(arguments: &[String], kind: FlagKind) -> Self {
        Self {
            arguments: arguments.to_vec(),
            kind,
        }
    }

    /// The flag itself, without its value
    pub fn name(&self) -> &str {
        self.arguments.first().map(String::as_str).unwrap_or_default()
    }

    /// The value of a flag, attached or separate
    pub fn value(&self, prefix: &str) -> Option<&str> {
        match self.arguments.as_slice() {
            [_, value] => Some(value.as_str()),
            [flag] if flag.len() > prefix.len() => flag.strip_prefix(prefix),
            _ => None,
        }
    }
}

/// How a flag takes its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value {
    /// The flag stands alone
    None,
    /// The value is always the next argument (`-Xlinker arg`)
    Separate,
    /// The value is glued or the next argument (`-Idir`, `-I dir`)
    Attached,
    /// The value follows an equal sign (`-std=c11`)
    Equal,
    /// Anything starting with the name (`-Wl,...`, `-print-...`)
    Prefix,
}

struct FlagDefinition {
    name: &'static str,
    value: Value,
    kind: FlagKind,
}

const fn flag(name: &'static str, value: Value, kind: FlagKind) -> FlagDefinition {
    FlagDefinition { name, value, kind }
}

const GCC_FLAGS: &[FlagDefinition] = &[
    flag("-x", Value::Attached, FlagKind::KindOfOutput),
    flag("-c", Value::None, FlagKind::KindOfOutputNoLinking),
    flag("-S", Value::None, FlagKind::KindOfOutputNoLinking),
    flag("-E", Value::None, FlagKind::KindOfOutputNoLinking),
    flag("-o", Value::Attached, FlagKind::KindOfOutputOutput),
    flag("-v", Value::None, FlagKind::KindOfOutputInfo),
    flag("-###", Value::None, FlagKind::KindOfOutputInfo),
    flag("--help", Value::Prefix, FlagKind::KindOfOutputInfo),
    flag("--version", Value::None, FlagKind::KindOfOutputInfo),
    flag("-dumpversion", Value::None, FlagKind::KindOfOutputInfo),
    flag("-dumpfullversion", Value::None, FlagKind::KindOfOutputInfo),
    flag("-dumpmachine", Value::None, FlagKind::KindOfOutputInfo),
    flag("-dumpspecs", Value::None, FlagKind::KindOfOutputInfo),
    flag("-print-", Value::Prefix, FlagKind::KindOfOutputInfo),
    flag("--print-", Value::Prefix, FlagKind::KindOfOutputInfo),
    flag("-pass-exit-codes", Value::None, FlagKind::KindOfOutput),
    flag("-pipe", Value::None, FlagKind::KindOfOutput),
    flag("-specs", Value::Equal, FlagKind::KindOfOutput),
    flag("-wrapper", Value::Separate, FlagKind::KindOfOutput),
    flag("-D", Value::Attached, FlagKind::Preprocessor),
    flag("-U", Value::Attached, FlagKind::Preprocessor),
    flag("-I", Value::Attached, FlagKind::Preprocessor),
    flag("-include", Value::Separate, FlagKind::Preprocessor),
    flag("-imacros", Value::Separate, FlagKind::Preprocessor),
    flag("-isystem", Value::Attached, FlagKind::Preprocessor),
    flag("-iquote", Value::Attached, FlagKind::Preprocessor),
    flag("-idirafter", Value::Attached, FlagKind::Preprocessor),
    flag("-iprefix", Value::Attached, FlagKind::Preprocessor),
    flag("-iwithprefix", Value::Attached, FlagKind::Preprocessor),
    flag("-iwithprefixbefore", Value::Attached, FlagKind::Preprocessor),
    flag("-isysroot", Value::Attached, FlagKind::Preprocessor),
    flag("-nostdinc", Value::None, FlagKind::Preprocessor),
    flag("-nostdinc++", Value::None, FlagKind::Preprocessor),
    flag("-undef", Value::None, FlagKind::Preprocessor),
    flag("-Xpreprocessor", Value::Separate, FlagKind::Preprocessor),
    flag("-M", Value::None, FlagKind::PreprocessorMake),
    flag("-MM", Value::None, FlagKind::PreprocessorMake),
    flag("-MD", Value::None, FlagKind::PreprocessorMake),
    flag("-MMD", Value::None, FlagKind::PreprocessorMake),
    flag("-MG", Value::None, FlagKind::PreprocessorMake),
    flag("-MP", Value::None, FlagKind::PreprocessorMake),
    flag("-MF", Value::Attached, FlagKind::PreprocessorMake),
    flag("-MT", Value::Attached, FlagKind::PreprocessorMake),
    flag("-MQ", Value::Attached, FlagKind::PreprocessorMake),
    flag("-l", Value::Attached, FlagKind::Linker),
    flag("-Wl,", Value::Prefix, FlagKind::Linker),
    flag("-Xlinker", Value::Separate, FlagKind::Linker),
    flag("-u", Value::Attached, FlagKind::Linker),
    flag("-T", Value::Attached, FlagKind::Linker),
    flag("-shared", Value::None, FlagKind::Linker),
    flag("-static", Value::None, FlagKind::Linker),
    flag("-static-libgcc", Value::None, FlagKind::Linker),
    flag("-static-libstdc++", Value::None, FlagKind::Linker),
    flag("-rdynamic", Value::None, FlagKind::Linker),
    flag("-pie", Value::None, FlagKind::Linker),
    flag("-no-pie", Value::None, FlagKind::Linker),
    flag("-s", Value::None, FlagKind::Linker),
    flag("-nostdlib", Value::None, FlagKind::Linker),
    flag("-nostartfiles", Value::None, FlagKind::Linker),
    flag("-nodefaultlibs", Value::None, FlagKind::Linker),
    flag("-L", Value::Attached, FlagKind::DirectorySearchLinker),
    flag("-B", Value::Attached, FlagKind::DirectorySearch),
    flag("--sysroot", Value::Equal, FlagKind::DirectorySearch),
    flag("-Xassembler", Value::Separate, FlagKind::Other),
    flag("-Xclang", Value::Separate, FlagKind::Other),
    flag("-target", Value::Separate, FlagKind::Other),
    flag("-arch", Value::Separate, FlagKind::Other),
    flag("-aux-info", Value::Separate, FlagKind::Other),
    flag("--param", Value::Separate, FlagKind::Other),
];

const SOURCE_EXTENSIONS: &[&str] = &[
    // headers
    "h", "hh", "H", "hp", "hxx", "hpp", "HPP", "h++", "tcc",
    // C
    "c", "C",
    // C++
    "cc", "CC", "c++", "C++", "cxx", "cpp", "cp",
    // CUDA
    "cu",
    // Objective-C
    "m", "mi", "mm", "M", "mii",
    // preprocessed
    "i", "ii",
    // assembly
    "s", "S", "sx", "asm",
    // Fortran
    "f", "for", "ftn", "F", "FOR", "fpp", "FPP", "FTN",
    "f90", "f95", "f03", "f08", "F90", "F95", "F03", "F08",
    // Go
    "go",
    // BRIG
    "brig",
    // D
    "d", "di", "dd",
    // Ada
    "ads", "adb",
];

const OBJECT_EXTENSIONS: &[&str] = &["o", "obj", "a", "lib", "so", "dylib", "dll", "lo", "la"];

pub fn is_source(argument: &str) -> bool {
    Path::new(argument)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn is_object(argument: &str) -> bool {
    if let Some(ext) = Path::new(argument).extension().and_then(|ext| ext.to_str()) {
        if OBJECT_EXTENSIONS.contains(&ext) {
            return true;
        }
    }
    // versioned shared objects: libfoo.so.1.2
    argument.contains(".so.")
}

/// Number of arguments the flag at the head of `arguments` consumes, and its kind
fn lookup(arguments: &[String]) -> Option<(usize, FlagKind)> {
    let candidate = arguments.first()?.as_str();

    if let Some(definition) = GCC_FLAGS.iter().find(|d| d.name == candidate) {
        let count = match definition.value {
            Value::Separate | Value::Attached => 2,
            Value::None | Value::Equal | Value::Prefix => 1,
        };
        return Some((count.min(arguments.len()), definition.kind));
    }

    GCC_FLAGS
        .iter()
        .filter(|d| match d.value {
            Value::Attached => candidate.len() > d.name.len() && candidate.starts_with(d.name),
            Value::Equal => candidate
                .strip_prefix(d.name)
                .is_some_and(|rest| rest.starts_with('=')),
            Value::Prefix => candidate.starts_with(d.name),
            Value::None | Value::Separate => false,
        })
        .max_by_key(|d| d.name.len())
        .map(|d| (1, d.kind))
}

/// Splits the arguments (without argv[0]) into classified flags
pub fn parse(arguments: &[String]) -> Vec<CompilerFlag> {
    let mut flags = Vec::new();
    let mut rest = arguments;

    while let Some(head) = rest.first() {
        let (count, kind) = if head.len() > 1 && head.starts_with('-') {
            lookup(rest).unwrap_or((1, FlagKind::Other))
        } else if is_source(head) {
            (1, FlagKind::Source)
        } else if is_object(head) {
            (1, FlagKind::LinkerObjectFile)
        } else {
            (1, FlagKind::Other)
        };
        flags.push(CompilerFlag::new(&rest[..count], kind));
        rest = &rest[count..];
    }
    flags
}
