// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use hon_parameter::{ParamValue, Parameter, Rule, RuleEffect};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// The rules of one rule tree, keyed by trigger parameter.
///
/// A rule tree is addressed by target key, then trigger key (optionally
/// `@`-prefixed), then a `|`-separated list of trigger values. A value maps
/// either to a leaf effect (it carries a `typology`), to a nested tree that
/// adds one more condition, or to a bare scalar that is read as a fixed
/// effect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: IndexMap<String, Vec<Rule>>,
    duplicated: bool,
}

impl RuleSet {
    /// Parses a rule tree.
    ///
    /// # Arguments
    ///
    /// * `tree` - The rule tree, keyed by target parameter
    /// * `aliases` - Schema key -> live parameter key
    #[must_use]
    pub fn parse(tree: &Map<String, Value>, aliases: &BTreeMap<String, String>) -> Self {
        let mut rule_set: Self = Self::default();
        for (param_key, conditions) in tree {
            let param_key: String = alias(aliases, param_key);
            let Value::Object(conditions) = conditions else {
                warn!(key = %param_key, "Rule target without conditions");
                continue;
            };
            for (trigger_key, trigger_data) in conditions {
                rule_set.parse_conditions(
                    &param_key,
                    trigger_key,
                    trigger_data,
                    &BTreeMap::new(),
                    aliases,
                );
            }
        }
        rule_set
    }

    fn parse_conditions(
        &mut self,
        param_key: &str,
        trigger_key: &str,
        trigger_data: &Value,
        extras: &BTreeMap<String, String>,
        aliases: &BTreeMap<String, String>,
    ) {
        let trigger_key: String = alias(aliases, &trigger_key.replace('@', ""));
        let Value::Object(trigger_data) = trigger_data else {
            debug!(key = %param_key, trigger = %trigger_key, "Skipping malformed rule condition");
            return;
        };
        for (multi_value, data) in trigger_data {
            for trigger_value in multi_value.split('|') {
                match data {
                    Value::Object(effect) if effect.contains_key("typology") => {
                        self.create_rule(param_key, &trigger_key, trigger_value, effect, extras);
                    }
                    Value::Object(nested) => {
                        let mut extras: BTreeMap<String, String> = extras.clone();
                        extras.insert(trigger_key.clone(), String::from(trigger_value));
                        for (extra_key, extra_data) in nested {
                            self.parse_conditions(param_key, extra_key, extra_data, &extras, aliases);
                        }
                    }
                    leaf => {
                        let mut effect: Map<String, Value> = Map::new();
                        effect.insert(String::from("typology"), Value::from("fixed"));
                        effect.insert(String::from("fixedValue"), leaf.clone());
                        self.create_rule(param_key, &trigger_key, trigger_value, &effect, extras);
                    }
                }
            }
        }
    }

    fn create_rule(
        &mut self,
        param_key: &str,
        trigger_key: &str,
        trigger_value: &str,
        data: &Map<String, Value>,
        extras: &BTreeMap<String, String>,
    ) {
        if data.get("fixedValue").and_then(Value::as_str) == Some(format!("@{param_key}").as_str()) {
            return;
        }
        let Some(effect) = RuleEffect::from_schema(data) else {
            warn!(
                key = %param_key,
                trigger = %trigger_key,
                value = %trigger_value,
                "Ignoring rule with unrecognized effect"
            );
            return;
        };
        self.rules
            .entry(String::from(trigger_key))
            .or_default()
            .push(Rule::new(
                String::from(trigger_key),
                String::from(trigger_value),
                String::from(param_key),
                effect,
                extras.clone(),
            ));
    }

    /// Re-keys every multi-condition rule under each of its extra conditions.
    ///
    /// The copy keyed under an extra carries the remaining extras plus the
    /// original trigger, so the rule fires whichever condition is met last.
    /// Runs at most once.
    pub fn duplicate_for_extra_conditions(&mut self) {
        if self.duplicated {
            return;
        }
        self.duplicated = true;
        let mut duplicates: Vec<Rule> = Vec::new();
        for rule in self.rules.values().flatten() {
            for (key, value) in &rule.extras {
                let mut extras: BTreeMap<String, String> = rule.extras.clone();
                extras.remove(key);
                extras.insert(rule.trigger_key.clone(), rule.trigger_value.clone());
                duplicates.push(Rule::new(
                    key.clone(),
                    value.clone(),
                    rule.param_key.clone(),
                    rule.effect.clone(),
                    extras,
                ));
            }
        }
        for rule in duplicates {
            self.rules
                .entry(rule.trigger_key.clone())
                .or_default()
                .push(rule);
        }
    }

    /// Installs the rules as triggers on the parameters they are keyed by.
    ///
    /// # Returns
    ///
    /// * The rules whose trigger parameter already holds the trigger value;
    ///   the caller applies them right away
    pub fn patch(&mut self, parameters: &mut IndexMap<String, Parameter>) -> Vec<Rule> {
        self.duplicate_for_extra_conditions();
        let mut immediate: Vec<Rule> = Vec::new();
        for (name, parameter) in parameters.iter_mut() {
            let Some(rules) = self.rules.get(name) else {
                continue;
            };
            for rule in rules {
                if parameter.add_trigger(rule.clone()) {
                    immediate.push(rule.clone());
                }
            }
        }
        immediate
    }

    /// Returns the rules keyed by trigger parameter.
    #[must_use]
    pub const fn rules(&self) -> &IndexMap<String, Vec<Rule>> {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Returns `true` if the tree produced no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns `true` if every extra condition of `rule` holds on `parameters`.
#[must_use]
pub fn extra_rules_matches(parameters: &IndexMap<String, Parameter>, rule: &Rule) -> bool {
    rule.extras.iter().all(|(key, value)| {
        parameters
            .get(key)
            .is_some_and(|parameter| parameter.intern_value().to_string() == *value)
    })
}

/// Applies `rule` to its target if its extra conditions hold.
///
/// # Returns
///
/// * `true` if the target was changed
pub fn apply_rule(parameters: &mut IndexMap<String, Parameter>, rule: &Rule) -> bool {
    if !extra_rules_matches(parameters, rule) {
        return false;
    }
    let Some(target) = parameters.get_mut(&rule.param_key) else {
        return false;
    };
    match &rule.effect {
        RuleEffect::Fixed(value) => apply_fixed(target, value),
        RuleEffect::Enum { values, default } => {
            apply_enum(target, values.as_deref(), default.as_deref())
        }
    }
}

fn apply_fixed(target: &mut Parameter, value: &ParamValue) -> bool {
    match target {
        Parameter::Enum(parameter) => {
            let text: String = value.to_string();
            parameter.set_values(vec![text.clone()]);
            parameter.set_value(&ParamValue::Text(text)).is_ok()
        }
        Parameter::Range(parameter) => {
            let Some(number) = value.as_f64() else {
                warn!(key = %parameter.base().key(), value = %value, "Fixed rule value is not a number");
                return false;
            };
            parameter.widen_to(number);
            true
        }
        Parameter::Fixed(parameter) => {
            parameter.override_value(value.clone());
            true
        }
        Parameter::Program(parameter) => {
            debug!(key = %parameter.base().key(), "Rules never target the category selector");
            false
        }
    }
}

fn apply_enum(target: &mut Parameter, values: Option<&[String]>, default: Option<&str>) -> bool {
    let Parameter::Enum(parameter) = target else {
        return false;
    };
    if let Some(values) = values {
        parameter.set_values(values.to_vec());
    }
    if let Some(default) = default
        && let Err(e) = parameter.set_value(&ParamValue::from(default))
    {
        debug!(error = %e, "Rule default rejected");
    }
    true
}

fn alias(aliases: &BTreeMap<String, String>, key: &str) -> String {
    aliases
        .get(key)
        .cloned()
        .unwrap_or_else(|| String::from(key))
}
