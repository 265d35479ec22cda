use std::fs;
use std::path::Path;
use variants::{
    ArtifactLayout, BuildOutcome, Config, ConsoleReporter, Pipeline, SystemRunner, TargetTable,
};

const TEMPLATE: &str = r#"
#define BC7E_MAX_PARTITIONS 64
struct bc7e_compress_block_params { int m_max_partitions; };
export void bc7e_compress_blocks(uniform bc7e_compress_block_params p[]) {
    // BC7E_ and bc7e_ prefixes are rewritten per target
}
"#;

fn config_in(dir: &Path) -> Config {
    Config {
        layout: ArtifactLayout::new(
            "bc7e.ispc",
            "bc7e_{target}.ispc",
            "bc7e_{target}.obj",
            "bc7e_ispc_{target}.h",
        )
        .unwrap()
        .rooted_at(dir),
        ..Config::default()
    }
}

fn quiet() -> ConsoleReporter<Vec<u8>, Vec<u8>> {
    ConsoleReporter::new(Vec::new(), Vec::new(), false, false)
}

#[test]
fn test_variants_have_no_bare_prefixes() {
    variants::logging::init_test();
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(&config.layout.template, TEMPLATE).unwrap();

    let expected_upper = TEMPLATE.matches("BC7E_").count();
    let expected_lower = TEMPLATE.matches("bc7e_").count();

    let mut reporter = quiet();
    Pipeline::new(config.clone()).generate(&mut reporter).unwrap();

    for target in config.targets.iter() {
        let text = fs::read_to_string(config.layout.source_for(target)).unwrap();
        let upper_new = format!("BC7E_{}_", target.name.to_uppercase());
        let lower_new = format!("bc7e_{}_", target.name);

        assert_eq!(text.matches(&upper_new).count(), expected_upper);
        assert_eq!(text.matches(&lower_new).count(), expected_lower);
        // Every remaining old token must be the start of a new one
        assert_eq!(text.matches("BC7E_").count(), expected_upper);
        assert_eq!(text.matches("bc7e_").count(), expected_lower);
    }

    let (out, _) = reporter.into_inner();
    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.lines().count(), 4);
    assert!(out.lines().all(|l| l.ends_with(" generate done")));
}

#[test]
fn test_generation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(&config.layout.template, TEMPLATE).unwrap();
    let pipeline = Pipeline::new(config.clone());

    pipeline.generate(&mut quiet()).unwrap();
    let first: Vec<Vec<u8>> = config
        .targets
        .iter()
        .map(|t| fs::read(config.layout.source_for(t)).unwrap())
        .collect();

    pipeline.generate(&mut quiet()).unwrap();
    let second: Vec<Vec<u8>> = config
        .targets
        .iter()
        .map(|t| fs::read(config.layout.source_for(t)).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_exact_avx2_example() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(&config.layout.template, "BC7E_ bc7e_").unwrap();

    Pipeline::new(config.clone()).generate(&mut quiet()).unwrap();

    let avx2 = TargetTable::default().get("avx2").cloned().unwrap();
    let text = fs::read_to_string(config.layout.source_for(&avx2)).unwrap();
    assert_eq!(text, "BC7E_AVX2_ bc7e_avx2_");
}

#[test]
fn test_missing_template_produces_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let mut reporter = quiet();
    let outcome = Pipeline::new(config).generate(&mut reporter).unwrap();

    assert!(outcome.is_template_missing());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    let (out, err) = reporter.into_inner();
    assert!(String::from_utf8(out).unwrap().ends_with("unable to get the file.\n"));
    assert!(!err.is_empty());
}

#[cfg(unix)]
#[test]
fn test_real_processes_classify_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    fs::write(&config.layout.template, TEMPLATE).unwrap();

    // `true` and `false` ignore their arguments
    config.compiler.program = "true".to_string();
    let summary = Pipeline::new(config.clone())
        .run(&mut SystemRunner, &mut quiet())
        .unwrap();
    assert!(summary.all_succeeded());

    config.compiler.program = "false".to_string();
    let summary = Pipeline::new(config.clone())
        .build(&mut SystemRunner, &mut quiet());
    assert!(summary
        .iter()
        .all(|r| r.outcome == BuildOutcome::Failed { code: Some(1) }));

    config.compiler.program = "isagen-test-no-such-compiler".to_string();
    let results = Pipeline::new(config).build(&mut SystemRunner, &mut quiet());
    assert_eq!(results.len(), 4);
    assert!(results
        .iter()
        .all(|r| matches!(r.outcome, BuildOutcome::LaunchFailed { .. })));
}
