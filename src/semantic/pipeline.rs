//! Dispatch of traced executions to compiler families

use super::forest::Forest;
use super::tools::{ToolClang, ToolCuda, ToolExtendingWrapper, ToolGcc, ToolLinker, ToolWrapper};
use super::{RecognitionError, Semantic, Tool};
use crate::config::Compilation;
use crate::output::Entry;
use crate::trace::{Execution, Pid, Report};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Ordered set of compiler families with an exclude list
///
/// Built once from configuration and shared read-only afterwards. The order
/// of the tools is their priority: the first one recognizing a program wins.
pub struct RecognitionPipeline {
    tools: Vec<Arc<dyn Tool>>,
    to_exclude: Vec<PathBuf>,
}

impl RecognitionPipeline {
    pub fn new(tools: Vec<Arc<dyn Tool>>, to_exclude: Vec<PathBuf>) -> Self {
        Self { tools, to_exclude }
    }

    /// Built-in families followed by the compilers declared in the configuration
    pub fn from_config(config: &Compilation) -> Self {
        let mut tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(ToolGcc),
            Arc::new(ToolClang),
            Arc::new(ToolWrapper),
            Arc::new(ToolCuda),
            Arc::new(ToolLinker),
        ];
        for compiler in &config.compilers_to_recognize {
            tools.push(Arc::new(ToolExtendingWrapper::new(compiler.clone())));
        }

        Self::new(tools, config.compilers_to_exclude.clone())
    }

    pub fn tools(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|tool| tool.as_ref())
    }

    /// Compilation database entries for every recognized execution of the trace
    pub fn transform(&self, report: &Report) -> Vec<Entry> {
        let forest: Forest<'_, Pid, Execution> =
            Forest::new(&report.executions, Execution::pid, Execution::ppid);

        let semantics = forest.bfs(|execution| self.recognize(execution));
        debug!(
            executions = report.executions.len(),
            recognized = semantics.len(),
            "Recognition finished"
        );

        semantics.iter().filter_map(Semantic::to_entry).collect()
    }

    pub fn recognize(&self, execution: &Execution) -> Result<Vec<Semantic>, RecognitionError> {
        let pid = execution.pid();
        debug!("[pid: {}] command: {}", pid, execution.command);

        let result = self.select(&execution.command.program).and_then(|tool| {
            debug!("[pid: {}] recognized with: {}", pid, tool.name());
            tool.compilations(&execution.command)
        });

        match &result {
            Ok(semantics) => debug!(
                "[pid: {}] recognized as: [{}]",
                pid,
                semantics
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Err(error) => debug!("[pid: {}] failed: {}", pid, error),
        }
        result
    }

    /// The tool responsible for `program`
    pub fn select(&self, program: &Path) -> Result<&dyn Tool, RecognitionError> {
        if self.to_exclude.iter().any(|excluded| excluded == program) {
            return Err(RecognitionError::Excluded(program.to_path_buf()));
        }

        self.tools
            .iter()
            .find(|tool| tool.recognize(program))
            .map(|tool| tool.as_ref())
            .ok_or_else(|| RecognitionError::NotRecognized(program.to_path_buf()))
    }
}

impl Default for RecognitionPipeline {
    fn default() -> Self {
        Self::from_config(&Compilation::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerWrapper;
    use crate::trace::Command;

    fn execution(pid: u32, ppid: u32, program: &str, arguments: &[&str]) -> Execution {
        Execution::new(pid, ppid, Command::new(program, arguments.iter().copied(), "/src"))
    }

    struct Named(&'static str, &'static str);

    impl Tool for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn recognize(&self, program: &Path) -> bool {
            program.file_name().is_some_and(|name| name == self.1)
        }

        fn compilations(&self, command: &Command) -> Result<Vec<Semantic>, RecognitionError> {
            Ok(vec![Semantic::QueryCompiler {
                command: command.clone(),
            }])
        }
    }

    #[test]
    fn test_default_tool_order() {
        let pipeline = RecognitionPipeline::default();
        let names: Vec<&str> = pipeline.tools().map(|t| t.name()).collect();
        assert_eq!(names, vec!["GCC", "clang", "wrapper", "CUDA", "linker"]);
    }

    #[test]
    fn test_configured_compilers_come_last() {
        let config = Compilation {
            compilers_to_recognize: vec![
                CompilerWrapper::new("/opt/a/cc1"),
                CompilerWrapper::new("/opt/b/cc2"),
            ],
            compilers_to_exclude: vec![],
        };
        let pipeline = RecognitionPipeline::from_config(&config);
        let names: Vec<&str> = pipeline.tools().map(|t| t.name()).collect();
        assert_eq!(names.len(), 7);
        assert_eq!(names[5..], ["extending wrapper", "extending wrapper"]);

        let selected = pipeline.select(Path::new("/opt/b/cc2")).unwrap();
        assert_eq!(selected.name(), "extending wrapper");
    }

    #[test]
    fn test_select_first_match_wins() {
        let pipeline = RecognitionPipeline::new(
            vec![Arc::new(Named("first", "cc")), Arc::new(Named("second", "cc"))],
            vec![],
        );
        assert_eq!(pipeline.select(Path::new("/usr/bin/cc")).unwrap().name(), "first");
    }

    #[test]
    fn test_builtin_wins_over_configured_compiler() {
        let config = Compilation {
            compilers_to_recognize: vec![CompilerWrapper::new("/usr/bin/gcc")],
            compilers_to_exclude: vec![],
        };
        let pipeline = RecognitionPipeline::from_config(&config);
        assert_eq!(pipeline.select(Path::new("/usr/bin/gcc")).unwrap().name(), "GCC");
    }

    #[test]
    fn test_exclude_takes_precedence() {
        let config = Compilation {
            compilers_to_recognize: vec![],
            compilers_to_exclude: vec![PathBuf::from("/usr/bin/gcc")],
        };
        let pipeline = RecognitionPipeline::from_config(&config);

        let err = pipeline.select(Path::new("/usr/bin/gcc")).err();
        assert_eq!(err, Some(RecognitionError::Excluded(PathBuf::from("/usr/bin/gcc"))));

        // only the exact path is excluded
        assert!(pipeline.select(Path::new("/usr/local/bin/gcc")).is_ok());
    }

    #[test]
    fn test_select_not_recognized() {
        let pipeline = RecognitionPipeline::default();
        let err = pipeline.select(Path::new("/usr/bin/make")).err();
        assert_eq!(err, Some(RecognitionError::NotRecognized(PathBuf::from("/usr/bin/make"))));
    }

    #[test]
    fn test_recognize_propagates_tool_failure() {
        let pipeline = RecognitionPipeline::default();
        let err = pipeline
            .recognize(&execution(1, 0, "/usr/bin/gcc", &["gcc", "main.o", "-o", "app"]))
            .unwrap_err();
        assert!(matches!(err, RecognitionError::NotACompilation { .. }));
    }

    #[test]
    fn test_transform_single_compilation() {
        let report = Report::new(vec![execution(1, 0, "/usr/bin/gcc", &["gcc", "-c", "a.c"])]);
        let entries = RecognitionPipeline::default().transform(&report);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file, PathBuf::from("/src/a.c"));
        assert_eq!(entries[0].directory, PathBuf::from("/src"));
    }

    #[test]
    fn test_transform_prunes_recognized_subtrees() {
        let report = Report::new(vec![
            execution(1, 0, "/usr/local/cuda/bin/nvcc", &["nvcc", "a.cu"]),
            execution(2, 1, "/usr/bin/gcc", &["gcc", "-c", "a.c"]),
        ]);
        let entries = RecognitionPipeline::default().transform(&report);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file, PathBuf::from("/src/a.cu"));
    }

    #[test]
    fn test_transform_descends_through_pure_link() {
        let report = Report::new(vec![
            execution(1, 0, "/usr/bin/ld", &["ld", "main.o", "-o", "app"]),
            execution(2, 1, "/usr/bin/gcc", &["gcc", "-c", "a.c"]),
        ]);
        let entries = RecognitionPipeline::default().transform(&report);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file, PathBuf::from("/src/a.c"));
    }

    #[test]
    fn test_pipeline_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecognitionPipeline>();
    }

    #[test]
    fn test_transform_drops_queries() {
        let report = Report::new(vec![execution(5, 0, "/usr/bin/gcc", &["gcc", "--version"])]);
        assert!(RecognitionPipeline::default().transform(&report).is_empty());
    }

    #[test]
    fn test_transform_descends_through_unrecognized() {
        let report = Report::new(vec![
            execution(10, 1, "/usr/bin/make", &["make"]),
            execution(11, 10, "/bin/sh", &["sh", "-c", "gcc -c b.c"]),
            execution(12, 11, "/usr/bin/gcc", &["gcc", "-c", "b.c"]),
            execution(13, 10, "/usr/bin/gcc", &["gcc", "-c", "a.c"]),
        ]);
        let entries = RecognitionPipeline::default().transform(&report);
        let files: Vec<PathBuf> = entries.into_iter().map(|e| e.file).collect();

        assert_eq!(files, vec![PathBuf::from("/src/a.c"), PathBuf::from("/src/b.c")]);
    }
}
