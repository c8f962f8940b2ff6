//! Pipeline orchestration
//!
//! parse -> global table -> semantic analysis -> evaluation. A stage that
//! reports errors stops the pipeline; warnings never do.

use crate::common::{CompileError, CompileResult, Diagnostic, DiagnosticReporter, Diagnostics, Stage};
use crate::frontend::{self, ast::Program};
use crate::interp::{BodyPolicy, Evaluator};
use crate::sema::{GlobalTableBuilder, SemanticAnalyzer};
use crate::symbol::Scope;
use crate::types::Value;

/// Configuration options for a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub dump_globals: bool,
    pub body_policy: BodyPolicy,
}

/// Where diagnostics get rendered while the pipeline runs
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self { filename, file_id, reporter }
    }
}

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Global table as built, before evaluation
    pub globals: Scope,
    /// Global table after `main` returned, with writes to global `var`s
    pub final_globals: Scope,
    /// Warnings from every stage
    pub warnings: Vec<Diagnostic>,
    /// What `main` left in its register
    pub value: Option<Value>,
}

/// The stages from source text to `main`'s result
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run source text, rendering every error and warning through `ctx`
    pub fn run_source(&self, source: &str, ctx: &CompileContext) -> CompileResult<RunReport> {
        log::info!("running {}", ctx.filename);
        let result = self.execute(source, Some(ctx));
        if let Err(e) = &result {
            ctx.reporter.report_error(ctx.file_id, e);
        }
        result
    }

    /// Run source text without rendering anything
    pub fn run(&self, source: &str) -> CompileResult<RunReport> {
        self.execute(source, None)
    }

    /// Run an already parsed program
    pub fn run_program(&self, program: &Program) -> CompileResult<RunReport> {
        self.execute_program(program, None)
    }

    fn execute(&self, source: &str, ctx: Option<&CompileContext>) -> CompileResult<RunReport> {
        if self.config.dump_tokens {
            let tokens = frontend::dump_tokens(source)?;
            eprintln!("=== Tokens ===");
            eprint!("{tokens}");
            eprintln!("=== End Tokens ===\n");
        }

        log::debug!("parsing");
        let program = frontend::parse(source)?;

        if self.config.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{}", frontend::dump_ast(&program));
            eprintln!("=== End AST ===\n");
        }

        self.execute_program(&program, ctx)
    }

    fn execute_program(&self, program: &Program, ctx: Option<&CompileContext>) -> CompileResult<RunReport> {
        let mut warnings = Vec::new();

        log::debug!("building global table");
        let globals = GlobalTableBuilder::new().build(program);
        Self::check_stage(Stage::Globals, globals.diagnostics, ctx, &mut warnings)?;

        if self.config.dump_globals {
            eprintln!("=== Globals ===");
            eprint!("{}", globals.scope);
            eprintln!("=== End Globals ===\n");
        }

        log::debug!("analyzing");
        let mut analyzer = SemanticAnalyzer::new(&globals.scope);
        analyzer.analyze(program);
        Self::check_stage(Stage::Analysis, analyzer.into_diagnostics(), ctx, &mut warnings)?;

        log::debug!("evaluating with {:?}", self.config.body_policy);
        let mut evaluator = Evaluator::new(globals.scope.clone()).with_policy(self.config.body_policy);
        let value = evaluator.run()?;
        log::info!("main returned {value:?}");

        Ok(RunReport {
            globals: globals.scope,
            final_globals: evaluator.into_globals(),
            warnings,
            value,
        })
    }

    /// Halt on errors; otherwise keep the warnings and move on
    fn check_stage(
        stage: Stage,
        diagnostics: Diagnostics,
        ctx: Option<&CompileContext>,
        warnings: &mut Vec<Diagnostic>,
    ) -> CompileResult<()> {
        if diagnostics.has_errors() {
            log::debug!("{stage} failed with {} error(s)", diagnostics.errors().len());
            return Err(CompileError::diagnostics(stage, diagnostics));
        }

        if let Some(ctx) = ctx {
            ctx.reporter.report_diagnostics(ctx.file_id, &diagnostics);
        }
        for warning in diagnostics.warnings() {
            log::warn!("{}: {}", warning.kind, warning.message);
        }
        warnings.extend(diagnostics.warnings().iter().cloned());
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DiagnosticKind, RuntimeError};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
# sample program
val limit : Int = (2 + 3) / 2
func double(val x : Int = 4) : Int -> x * 2
func main() : Int {
    var acc : Int = 3
    acc = acc * 3
    acc
}
";

    #[test]
    fn test_runs_sample_program() {
        let report = Pipeline::default().run(SAMPLE).unwrap();

        assert_eq!(report.value, Some(Value::Int(9)));
        assert!(report.warnings.is_empty());
        assert_eq!(report.globals.get("limit").unwrap().value(), Some(Value::Float(2.5)));
        assert!(report.globals.get("double").unwrap().as_function().is_some());
    }

    #[test]
    fn test_parse_error_stops_everything() {
        let result = Pipeline::default().run("val a : Int = \nfunc main() : Int -> 1");
        assert!(matches!(result, Err(CompileError::Parser { .. })));
    }

    #[test]
    fn test_lexer_error() {
        let result = Pipeline::default().run("val a : Int = 1 $ 2");
        assert!(matches!(result, Err(CompileError::Lexer { .. })));
    }

    #[test]
    fn test_global_errors_halt_before_analysis() {
        let result = Pipeline::default().run("val a : Int = b\nfunc main() : Int -> missing");

        match result {
            Err(CompileError::Diagnostics { stage, diagnostics }) => {
                assert_eq!(stage, Stage::Globals);
                assert_eq!(diagnostics.count(DiagnosticKind::UnknownSymbol), 1);
            }
            other => panic!("expected global table errors, got {other:?}"),
        }
    }

    #[test]
    fn test_analysis_errors_halt_before_evaluation() {
        let result = Pipeline::default().run("func main() : Int -> missing");

        match result {
            Err(CompileError::Diagnostics { stage, diagnostics }) => {
                assert_eq!(stage, Stage::Analysis);
                assert_eq!(diagnostics.errors().len(), 1);
            }
            other => panic!("expected analysis errors, got {other:?}"),
        }
    }

    #[test]
    fn test_warnings_do_not_halt() {
        let report = Pipeline::default()
            .run("var a : Int = 5\nfunc main() : Int {\n var a : Int = 1\n a + 1\n}")
            .unwrap();

        assert_eq!(report.value, Some(Value::Int(2)));
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, DiagnosticKind::ShadowingGlobal);
    }

    #[test]
    fn test_runtime_error_surfaces() {
        let result = Pipeline::default().run("val c : Int = 5\nfunc main() : Int {\n c = 6\n}");
        assert!(matches!(
            result,
            Err(CompileError::Runtime(RuntimeError::ImmutableReassignment { .. }))
        ));
    }

    #[test]
    fn test_missing_main() {
        let result = Pipeline::default().run("val a : Int = 1");
        assert!(matches!(result, Err(CompileError::Runtime(RuntimeError::UndefinedMain))));
    }

    #[test]
    fn test_body_policy_from_config() {
        let source = "func main() : Int {\n var a : Int = 1\n func f() : Int -> 2\n a + 1\n}";

        let stopped = Pipeline::default().run(source).unwrap();
        assert_eq!(stopped.value, Some(Value::Int(1)));

        let config = PipelineConfig {
            body_policy: BodyPolicy::RunToEnd,
            ..Default::default()
        };
        let completed = Pipeline::new(config).run(source).unwrap();
        assert_eq!(completed.value, Some(Value::Int(2)));
    }

    #[test]
    fn test_report_keeps_both_global_tables() {
        let report = Pipeline::default()
            .run("var counter : Int = 1\nfunc main() : Int {\n counter = counter + 1\n}")
            .unwrap();

        assert_eq!(report.globals.get("counter").unwrap().value(), Some(Value::Int(1)));
        assert_eq!(report.final_globals.get("counter").unwrap().value(), Some(Value::Int(2)));
    }

    #[test]
    fn test_dumps_do_not_change_the_result() {
        let config = PipelineConfig {
            dump_tokens: true,
            dump_ast: true,
            dump_globals: true,
            ..Default::default()
        };
        let report = Pipeline::new(config).run(SAMPLE).unwrap();
        assert_eq!(report.value, Some(Value::Int(9)));
    }

    #[test]
    fn test_run_program() {
        let program = frontend::parse("func main() : Float -> 1.5 * 2.0").unwrap();
        let report = Pipeline::default().run_program(&program).unwrap();
        assert_eq!(report.value, Some(Value::Float(3.0)));
    }
}
