// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{HashSet, VecDeque};

use hon_parameter::{Parameter, Rule};
use indexmap::IndexMap;
use tracing::debug;

use crate::rules::apply_rule;

/// Applies `seeds` and, breadth first, every rule their effects trigger.
///
/// Each `(parameter, value)` pair is expanded at most once per call, so a
/// schema whose rules feed back into each other still terminates.
///
/// # Returns
///
/// * The number of effects applied
pub(crate) fn propagate(parameters: &mut IndexMap<String, Parameter>, seeds: Vec<Rule>) -> usize {
    let mut visited: HashSet<(String, String)> = seeds
        .iter()
        .map(|rule| (rule.trigger_key.clone(), rule.trigger_value.to_lowercase()))
        .collect();
    let mut queue: VecDeque<Rule> = VecDeque::from(seeds);
    let mut applied: usize = 0;

    while let Some(rule) = queue.pop_front() {
        if !apply_rule(parameters, &rule) {
            continue;
        }
        applied += 1;
        let Some(target) = parameters.get(&rule.param_key) else {
            continue;
        };
        let value: String = target.intern_value().to_string().to_lowercase();
        if visited.insert((rule.param_key.clone(), value)) {
            queue.extend(target.triggered_rules());
        } else {
            debug!(key = %rule.param_key, "Trigger already expanded in this pass");
        }
    }
    applied
}

/// Collects the rules triggered by the current value of every parameter.
pub(crate) fn current_triggers(parameters: &IndexMap<String, Parameter>) -> Vec<Rule> {
    parameters
        .values()
        .flat_map(Parameter::triggered_rules)
        .collect()
}
