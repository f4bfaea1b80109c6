//! Pipeline configuration loading.
//!
//! A configuration document maps pipeline names to ordered step lists:
//!
//! ```yaml
//! discount:
//!   - FillNA:
//!       column_name: discount_pct
//!       value: 0
//!   - MathOperator:
//!       column_name: price
//!       logic: mul
//!       value: ${rate}
//!       output_column: scaled
//! ```
//!
//! Loading happens in two passes. The document is parsed into a YAML tree
//! first; then the selected pipeline's parameter values are walked and every
//! `${name}` placeholder is replaced by its [`Variable`]. A value consisting of
//! a single placeholder takes the variable's type, so `${rate}` bound to `0.1`
//! becomes a number. Placeholders inside longer strings are interpolated as text.

use super::variables::{Variable, Variables};
use crate::error::{MorphError, Result};
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use std::path::Path;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// One resolved step: a transformation name and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StepConfig {
    pub name: String,
    pub params: Mapping,
}

impl StepConfig {
    pub fn new(name: impl Into<String>, params: Mapping) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// A selected pipeline with all placeholders resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub name: String,
    pub steps: Vec<StepConfig>,
}

impl PipelineConfig {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Render the resolved steps back into the configuration layout.
    pub fn to_yaml(&self) -> Result<String> {
        let steps: Vec<Value> = self
            .steps
            .iter()
            .map(|step| {
                let mut entry = Mapping::new();
                entry.insert(
                    Value::String(step.name.clone()),
                    Value::Mapping(step.params.clone()),
                );
                Value::Mapping(entry)
            })
            .collect();

        let mut doc = Mapping::new();
        doc.insert(Value::String(self.name.clone()), Value::Sequence(steps));
        Ok(serde_yaml::to_string(&doc)?)
    }
}

/// Load `pipeline_name` from a YAML document, substituting `variables`.
///
/// # Errors
///
/// - [`MorphError::ConfigNotFound`] if the document has no such pipeline
/// - [`MorphError::MissingVariable`] if a placeholder has no value
/// - [`MorphError::InvalidConfig`] if the pipeline or a step is malformed
/// - [`MorphError::Yaml`] if the document does not parse
pub fn get_pipeline_config(
    source: &str,
    pipeline_name: &str,
    variables: &Variables,
) -> Result<PipelineConfig> {
    let doc = parse_document(source)?;

    let raw_steps = doc
        .get(pipeline_name)
        .ok_or_else(|| MorphError::ConfigNotFound(pipeline_name.to_owned()))?;

    let entries: &[Value] = match raw_steps {
        Value::Sequence(entries) => entries.as_slice(),
        Value::Null => &[],
        _ => {
            return Err(MorphError::InvalidConfig(format!(
                "pipeline '{pipeline_name}' must be a list of steps"
            )));
        }
    };

    let steps = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| parse_step(pipeline_name, idx, entry, variables))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        pipeline = pipeline_name,
        steps = steps.len(),
        "Loaded pipeline configuration"
    );

    Ok(PipelineConfig {
        name: pipeline_name.to_owned(),
        steps,
    })
}

/// Read a configuration file and load `pipeline_name` from it.
///
/// # Errors
///
/// Same as [`get_pipeline_config`], plus [`MorphError::Io`] if the file
/// cannot be read.
pub fn load_pipeline_config(
    path: impl AsRef<Path>,
    pipeline_name: &str,
    variables: &Variables,
) -> Result<PipelineConfig> {
    let source = std::fs::read_to_string(path.as_ref())?;
    get_pipeline_config(&source, pipeline_name, variables)
}

/// Names of all pipelines defined in a document, in declared order.
///
/// # Errors
///
/// Returns an error if the document does not parse or is not a mapping.
pub fn pipeline_names(source: &str) -> Result<Vec<String>> {
    let doc = parse_document(source)?;
    doc.keys()
        .map(|key| {
            key.as_str().map(ToOwned::to_owned).ok_or_else(|| {
                MorphError::InvalidConfig(format!("pipeline name must be a string, got {key:?}"))
            })
        })
        .collect()
}

fn parse_document(source: &str) -> Result<Mapping> {
    match serde_yaml::from_str::<Value>(source)? {
        Value::Mapping(doc) => Ok(doc),
        Value::Null => Ok(Mapping::new()),
        _ => Err(MorphError::InvalidConfig(
            "configuration root must map pipeline names to step lists".to_owned(),
        )),
    }
}

fn parse_step(
    pipeline: &str,
    idx: usize,
    entry: &Value,
    variables: &Variables,
) -> Result<StepConfig> {
    let invalid = |msg: &str| {
        MorphError::InvalidConfig(format!("pipeline '{pipeline}', step {}: {msg}", idx + 1))
    };

    let Value::Mapping(entry) = entry else {
        return Err(invalid("expected a mapping of transformation name to parameters"));
    };

    let mut items = entry.iter();
    let (Some((name, body)), None) = (items.next(), items.next()) else {
        return Err(invalid("expected exactly one transformation name"));
    };

    let name = name
        .as_str()
        .ok_or_else(|| invalid("transformation name must be a string"))?;

    let params = match body {
        Value::Mapping(params) => params
            .iter()
            .map(|(key, value)| Ok((key.clone(), substitute(value, variables)?)))
            .collect::<Result<Mapping>>()?,
        Value::Null => Mapping::new(),
        _ => return Err(invalid("parameters must be a mapping")),
    };

    Ok(StepConfig::new(name, params))
}

/// Replace placeholders throughout a parameter value.
fn substitute(value: &Value, variables: &Variables) -> Result<Value> {
    match value {
        Value::String(s) => substitute_str(s, variables),
        Value::Sequence(items) => items
            .iter()
            .map(|item| substitute(item, variables))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        Value::Mapping(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), substitute(v, variables)?)))
            .collect::<Result<Mapping>>()
            .map(Value::Mapping),
        Value::Tagged(tagged) => {
            let mut tagged = tagged.as_ref().clone();
            tagged.value = substitute(&tagged.value, variables)?;
            Ok(Value::Tagged(Box::new(tagged)))
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
    }
}

fn substitute_str(s: &str, variables: &Variables) -> Result<Value> {
    let lookup = |name: &str| {
        variables
            .get(name)
            .ok_or_else(|| MorphError::MissingVariable(name.to_owned()))
    };

    // Whole-value placeholder keeps the variable's type
    if let Some(caps) = PLACEHOLDER.captures(s)
        && caps.get(0).is_some_and(|m| m.as_str().len() == s.len())
        && let Some(name) = caps.get(1)
    {
        return lookup(name.as_str()).map(Variable::to_value);
    }

    if !PLACEHOLDER.is_match(s) {
        return Ok(Value::String(s.to_owned()));
    }

    // Check every name first so the error names the first missing one
    for caps in PLACEHOLDER.captures_iter(s) {
        if let Some(name) = caps.get(1) {
            lookup(name.as_str())?;
        }
    }

    let replaced = PLACEHOLDER.replace_all(s, |caps: &Captures<'_>| {
        caps.get(1)
            .and_then(|name| variables.get(name.as_str()))
            .map(ToString::to_string)
            .unwrap_or_default()
    });

    Ok(Value::String(replaced.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r"
food:
  - CreateColumn:
      column_name: food_marker
      value: food
  - FilterRows:
      first_column: item_type
      second_column: food_marker
      logic: e
  - RemoveColumns:
      columns_name: food_marker

scaled:
  - MathOperator:
      column_name: price
      logic: ${op}
      value: ${factor}
      output_column: price_${suffix}
  - RemoveColumns:
      columns_name: ${drop}
";

    fn param<'a>(step: &'a StepConfig, key: &str) -> &'a Value {
        step.params.get(key).expect("parameter present")
    }

    #[test]
    fn test_steps_keep_declared_order() {
        let config = get_pipeline_config(DOC, "food", &Variables::new()).unwrap();
        let names: Vec<&str> = config.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["CreateColumn", "FilterRows", "RemoveColumns"]);
        assert_eq!(
            param(&config.steps[1], "logic"),
            &Value::String("e".to_owned())
        );
    }

    #[test]
    fn test_placeholder_keeps_numeric_type() {
        let vars = Variables::new()
            .with("op", "mul")
            .with("factor", 5)
            .with("suffix", "x5")
            .with("drop", vec!["a", "b"]);
        let config = get_pipeline_config(DOC, "scaled", &vars).unwrap();

        let math = &config.steps[0];
        assert_eq!(param(math, "value"), &Value::Number(5.into()));
        assert_eq!(param(math, "logic"), &Value::String("mul".to_owned()));
        assert_eq!(
            param(math, "output_column"),
            &Value::String("price_x5".to_owned())
        );
        assert!(matches!(
            param(&config.steps[1], "columns_name"),
            Value::Sequence(items) if items.len() == 2
        ));
    }

    #[test]
    fn test_placeholders_inside_lists_and_mappings() {
        let doc = r"
p:
  - RemoveColumns:
      columns_name: [${first}, b]
  - Custom:
      options:
        limit: ${limit}
        label: run_${first}
";
        let vars = Variables::new().with("first", "a").with("limit", 10);
        let config = get_pipeline_config(doc, "p", &vars).unwrap();

        assert_eq!(
            param(&config.steps[0], "columns_name"),
            &Value::Sequence(vec!["a".into(), "b".into()])
        );

        let Value::Mapping(options) = param(&config.steps[1], "options") else {
            panic!("options should stay a mapping");
        };
        assert_eq!(options.get("limit"), Some(&Value::Number(10.into())));
        assert_eq!(options.get("label"), Some(&Value::String("run_a".to_owned())));
    }

    #[test]
    fn test_missing_variable_inside_list() {
        let doc = "p:\n  - RemoveColumns:\n      columns_name: [a, ${gone}]\n";
        let err = get_pipeline_config(doc, "p", &Variables::new()).unwrap_err();
        assert!(matches!(err, MorphError::MissingVariable(ref name) if name == "gone"));
    }

    #[test]
    fn test_missing_variable() {
        let vars = Variables::new().with("op", "mul").with("factor", 2);
        let err = get_pipeline_config(DOC, "scaled", &vars).unwrap_err();
        assert!(matches!(err, MorphError::MissingVariable(ref name) if name == "suffix"));
    }

    #[test]
    fn test_unknown_pipeline() {
        let err = get_pipeline_config(DOC, "drinks", &Variables::new()).unwrap_err();
        assert!(matches!(err, MorphError::ConfigNotFound(ref name) if name == "drinks"));
    }

    #[test]
    fn test_unused_variables_are_ignored() {
        let vars = Variables::new().with("unused", 1);
        assert!(get_pipeline_config(DOC, "food", &vars).is_ok());
    }

    #[test]
    fn test_step_with_two_names_is_rejected() {
        let doc = "p:\n  - FillNA: {column_name: a, value: 0}\n    DropNA: {column_name: a}\n";
        let err = get_pipeline_config(doc, "p", &Variables::new()).unwrap_err();
        assert!(matches!(err, MorphError::InvalidConfig(_)));
    }

    #[test]
    fn test_step_without_params() {
        let doc = "p:\n  - Noop:\n";
        let config = get_pipeline_config(doc, "p", &Variables::new()).unwrap();
        assert_eq!(config.steps, vec![StepConfig::new("Noop", Mapping::new())]);
    }

    #[test]
    fn test_pipeline_names_in_order() {
        assert_eq!(pipeline_names(DOC).unwrap(), ["food", "scaled"]);
    }

    #[test]
    fn test_to_yaml_round_trips_through_loader() {
        let config = get_pipeline_config(DOC, "food", &Variables::new()).unwrap();
        let yaml = config.to_yaml().unwrap();
        let reloaded = get_pipeline_config(&yaml, "food", &Variables::new()).unwrap();
        assert_eq!(reloaded, config);
    }
}
