use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};

/// Schema validation capability for theme and state-machine documents.
pub trait DocumentValidator: Send + Sync {
    /// Validate a theme document.
    fn validate_theme(&self, doc: &Value) -> Result<(), ValidationIssues>;

    /// Validate a state-machine document.
    fn validate_state_machine(&self, doc: &Value) -> Result<(), ValidationIssues>;
}

/// One element of a JSON path inside a validated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathElem {
    /// Object field.
    Field(&'static str),
    /// Array index.
    Index(usize),
}

/// A single validation problem located by JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Location of the problem; empty for the document root.
    pub path: Vec<PathElem>,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn at(path: &[PathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }

    /// Render the path as `$.field[0].other`.
    pub fn path_string(&self) -> String {
        let mut s = String::from("$");
        for p in &self.path {
            match *p {
                PathElem::Field(name) => {
                    s.push('.');
                    s.push_str(name);
                }
                PathElem::Index(i) => {
                    s.push('[');
                    s.push_str(&i.to_string());
                    s.push(']');
                }
            }
        }
        s
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path_string(), self.message)
    }
}

/// Non-empty list of issues returned by a failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssues {
    /// Every issue found, in document order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationIssues {
    /// Wrap a single root-level issue.
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            issues: vec![ValidationIssue::at(&[], message)],
        }
    }

    /// Number of issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// `true` when no issue is recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Iterate over the issues.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter()
    }
}

impl fmt::Display for ValidationIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationIssues {}

/// Rule types a theme may override.
pub const THEME_RULE_TYPES: &[&str] = &[
    "Color", "Scalar", "Position", "Vector", "Gradient", "Image", "Text",
];

/// State types a state machine may declare.
pub const STATE_TYPES: &[&str] = &["PlaybackState", "GlobalState"];

/// Built-in structural validator.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinValidator;

impl DocumentValidator for BuiltinValidator {
    fn validate_theme(&self, doc: &Value) -> Result<(), ValidationIssues> {
        let mut errors = Vec::new();
        let Some(root) = doc.as_object() else {
            return Err(ValidationIssues::single("theme must be a JSON object"));
        };

        match root.get("rules") {
            None => errors.push(ValidationIssue::at(
                &[PathElem::Field("rules")],
                "rules is required",
            )),
            Some(Value::Array(rules)) => {
                let mut path = vec![PathElem::Field("rules")];
                for (i, rule) in rules.iter().enumerate() {
                    path.push(PathElem::Index(i));
                    validate_rule(rule, &mut path, &mut errors);
                    path.pop();
                }
            }
            Some(_) => errors.push(ValidationIssue::at(
                &[PathElem::Field("rules")],
                "rules must be an array",
            )),
        }

        finish(errors)
    }

    fn validate_state_machine(&self, doc: &Value) -> Result<(), ValidationIssues> {
        let mut errors = Vec::new();
        let Some(root) = doc.as_object() else {
            return Err(ValidationIssues::single(
                "state machine must be a JSON object",
            ));
        };

        let initial = match root.get("initial") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            Some(_) => {
                errors.push(ValidationIssue::at(
                    &[PathElem::Field("initial")],
                    "initial must be a non-empty string",
                ));
                None
            }
            None => {
                errors.push(ValidationIssue::at(
                    &[PathElem::Field("initial")],
                    "initial is required",
                ));
                None
            }
        };

        let mut names = HashSet::<&str>::new();
        match root.get("states") {
            Some(Value::Array(states)) if !states.is_empty() => {
                let mut path = vec![PathElem::Field("states")];
                for (i, state) in states.iter().enumerate() {
                    path.push(PathElem::Index(i));
                    validate_state(state, &mut path, &mut names, &mut errors);
                    path.pop();
                }
            }
            Some(Value::Array(_)) => errors.push(ValidationIssue::at(
                &[PathElem::Field("states")],
                "states must contain at least one state",
            )),
            Some(_) => errors.push(ValidationIssue::at(
                &[PathElem::Field("states")],
                "states must be an array",
            )),
            None => errors.push(ValidationIssue::at(
                &[PathElem::Field("states")],
                "states is required",
            )),
        }

        if let Some(initial) = initial
            && !names.is_empty()
            && !names.contains(initial)
        {
            errors.push(ValidationIssue::at(
                &[PathElem::Field("initial")],
                format!("initial state '{initial}' is not declared in states"),
            ));
        }

        for field in ["interactions", "inputs"] {
            if let Some(v) = root.get(field)
                && !v.is_array()
            {
                errors.push(ValidationIssue::at(
                    &[PathElem::Field(field)],
                    format!("{field} must be an array"),
                ));
            }
        }
        if let Some(Value::Array(inputs)) = root.get("inputs") {
            let mut path = vec![PathElem::Field("inputs")];
            for (i, input) in inputs.iter().enumerate() {
                path.push(PathElem::Index(i));
                match input.as_object() {
                    Some(obj) => {
                        require_string(obj, "name", &mut path, &mut errors);
                        require_string(obj, "type", &mut path, &mut errors);
                    }
                    None => errors.push(ValidationIssue::at(&path, "input must be an object")),
                }
                path.pop();
            }
        }

        finish(errors)
    }
}

fn finish(errors: Vec<ValidationIssue>) -> Result<(), ValidationIssues> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationIssues { issues: errors })
    }
}

fn validate_rule(rule: &Value, path: &mut Vec<PathElem>, errors: &mut Vec<ValidationIssue>) {
    let Some(obj) = rule.as_object() else {
        errors.push(ValidationIssue::at(path, "rule must be an object"));
        return;
    };

    require_string(obj, "id", path, errors);

    match obj.get("type").and_then(Value::as_str) {
        Some(ty) if THEME_RULE_TYPES.contains(&ty) => {}
        Some(ty) => {
            path.push(PathElem::Field("type"));
            errors.push(ValidationIssue::at(
                path,
                format!("unknown rule type '{ty}'"),
            ));
            path.pop();
        }
        None => {
            path.push(PathElem::Field("type"));
            errors.push(ValidationIssue::at(path, "type must be a string"));
            path.pop();
        }
    }

    match (obj.get("value"), obj.get("keyframes")) {
        (None, None) => errors.push(ValidationIssue::at(
            path,
            "rule must define either value or keyframes",
        )),
        (_, Some(Value::Array(frames))) => {
            path.push(PathElem::Field("keyframes"));
            for (i, frame) in frames.iter().enumerate() {
                path.push(PathElem::Index(i));
                if !frame.get("frame").is_some_and(Value::is_number) {
                    errors.push(ValidationIssue::at(path, "keyframe needs a numeric frame"));
                }
                path.pop();
            }
            path.pop();
        }
        (_, Some(_)) => {
            path.push(PathElem::Field("keyframes"));
            errors.push(ValidationIssue::at(path, "keyframes must be an array"));
            path.pop();
        }
        (Some(_), None) => {}
    }

    if let Some(animations) = obj.get("animations") {
        let ok = animations
            .as_array()
            .is_some_and(|ids| ids.iter().all(Value::is_string));
        if !ok {
            path.push(PathElem::Field("animations"));
            errors.push(ValidationIssue::at(
                path,
                "animations must be an array of animation ids",
            ));
            path.pop();
        }
    }
}

fn validate_state<'a>(
    state: &'a Value,
    path: &mut Vec<PathElem>,
    names: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationIssue>,
) {
    let Some(obj) = state.as_object() else {
        errors.push(ValidationIssue::at(path, "state must be an object"));
        return;
    };

    if let Some(name) = require_string(obj, "name", path, errors)
        && !names.insert(name)
    {
        path.push(PathElem::Field("name"));
        errors.push(ValidationIssue::at(
            path,
            format!("duplicate state name '{name}'"),
        ));
        path.pop();
    }

    if let Some(ty) = require_string(obj, "type", path, errors)
        && !STATE_TYPES.contains(&ty)
    {
        path.push(PathElem::Field("type"));
        errors.push(ValidationIssue::at(path, format!("unknown state type '{ty}'")));
        path.pop();
    }

    if let Some(animation) = obj.get("animation")
        && !animation.is_string()
    {
        path.push(PathElem::Field("animation"));
        errors.push(ValidationIssue::at(path, "animation must be an animation id"));
        path.pop();
    }
}

fn require_string<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
    path: &mut Vec<PathElem>,
    errors: &mut Vec<ValidationIssue>,
) -> Option<&'a str> {
    match obj.get(field).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Some(s),
        _ => {
            path.push(PathElem::Field(field));
            errors.push(ValidationIssue::at(
                path,
                format!("{field} must be a non-empty string"),
            ));
            path.pop();
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;
