use groqfmt::formatter::{FormatOptions, RenderStyle, format_source};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn fmt(src: &str) -> String {
    format_source(src, &FormatOptions::default()).unwrap()
}

fn fmt_compact(src: &str) -> String {
    let opts = FormatOptions {
        style: RenderStyle::Compact,
    };
    format_source(src, &opts).unwrap()
}

/// Find all test cases in the examples directory
fn find_test_cases() -> Vec<TestCase> {
    let examples_dir = Path::new("tests/examples");
    let mut test_cases = Vec::new();

    for entry in WalkDir::new(examples_dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        // Inputs are named <case>_<n>.input
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            if file_name.ends_with(".input") && file_name.contains('_') {
                if let Some(test_case) = create_test_case(path) {
                    test_cases.push(test_case);
                }
            }
        }
    }

    test_cases
}

#[derive(Debug, Clone)]
struct TestCase {
    name: String,
    input_file: PathBuf,
    expected_file: PathBuf,
}

/// Pair an input file with the `<case>.groq` file holding the expected output
fn create_test_case(input_path: &Path) -> Option<TestCase> {
    let file_name = input_path.file_name()?.to_str()?;
    let parent_dir = input_path.parent()?;

    // "projection_2.input" -> "projection"
    let base_name = &file_name[..file_name.rfind('_')?];
    let expected_file = parent_dir.join(format!("{}.groq", base_name));

    if expected_file.exists() {
        Some(TestCase {
            name: format!("{}_{}", base_name, input_path.display()),
            input_file: input_path.to_path_buf(),
            expected_file,
        })
    } else {
        None
    }
}

fn run_test_case(test_case: &TestCase) -> Result<(), String> {
    let input_content = fs::read_to_string(&test_case.input_file).map_err(|e| {
        format!(
            "Failed to read input file {:?}: {}",
            test_case.input_file, e
        )
    })?;
    let expected_content = fs::read_to_string(&test_case.expected_file).map_err(|e| {
        format!(
            "Failed to read expected file {:?}: {}",
            test_case.expected_file, e
        )
    })?;

    let formatted_content = format_source(&input_content, &FormatOptions::default())
        .map_err(|e| format!("Failed to format {:?}: {}", test_case.input_file, e))?;

    if formatted_content == expected_content {
        Ok(())
    } else {
        Err(format!(
            "Formatting mismatch for test case '{}':\n\
             \n--- Expected ---\n{}\
             \n--- Got ---\n{}\
             \n--- Diff ---\n{}",
            test_case.name,
            expected_content,
            formatted_content,
            create_diff(&expected_content, &formatted_content)
        ))
    }
}

fn create_diff(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();

    let mut diff = String::new();
    for i in 0..expected_lines.len().max(actual_lines.len()) {
        let expected_line = expected_lines.get(i).unwrap_or(&"");
        let actual_line = actual_lines.get(i).unwrap_or(&"");
        if expected_line != actual_line {
            diff.push_str(&format!(
                "Line {}: Expected: {:?}, Got: {:?}\n",
                i + 1,
                expected_line,
                actual_line
            ));
        }
    }

    if diff.is_empty() {
        "No line differences (possibly trailing newlines)".to_string()
    } else {
        diff
    }
}

#[test]
fn example_files_formatting() {
    let test_cases = find_test_cases();
    assert!(
        !test_cases.is_empty(),
        "No test cases found in tests/examples/"
    );

    let failures: Vec<String> = test_cases
        .iter()
        .filter_map(|test_case| run_test_case(test_case).err())
        .collect();

    if !failures.is_empty() {
        panic!("Test failures:\n\n{}", failures.join("\n\n"));
    }
}

#[test]
fn expected_files_are_fixed_points() {
    for test_case in find_test_cases() {
        let expected = fs::read_to_string(&test_case.expected_file).unwrap();
        assert_eq!(fmt(&expected), expected, "{}", test_case.name);
    }
}

#[test]
fn compact_and_pretty_agree_on_meaning() {
    for test_case in find_test_cases() {
        let input = fs::read_to_string(&test_case.input_file).unwrap();
        let compact = fmt_compact(&input);
        assert!(!compact.trim_end().contains('\n'), "{compact}");
        assert_eq!(fmt(&compact), fmt(&input), "{}", test_case.name);
    }
}

#[test]
fn long_query_is_indented_only_in_pretty_style() {
    let input = r#"*[_type == "book" && defined(author)] { title, "author": author->name, "year": publicationYear }"#;

    let pretty = fmt(input);
    assert!(pretty.lines().count() > 1);
    assert!(pretty.contains("\n  \"author\": author->name,\n"));

    let compact = fmt_compact(input);
    assert_eq!(
        compact,
        "*[_type==\"book\"&&defined(author)]{title,\"author\":author->name,\"year\":publicationYear}\n"
    );
}

#[test]
fn comments_are_dropped() {
    assert_eq!(fmt("// all documents\n*"), "*\n");
}
