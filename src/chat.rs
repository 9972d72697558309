// ABOUTME: Nutrition assistant answering chat messages with macro lookups, an optional LLM, and canned tips
// ABOUTME: Every path produces a reply; LLM failures fall back to the keyword rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Nutrition Assistant
//!
//! Replies are chosen in order:
//! 1. an empty message gets a prompt to state a goal
//! 2. a nutrition question naming a catalog food gets its scaled macros
//! 3. the configured LLM, when it returns non-empty content
//! 4. keyword rules, then a default help message

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::llm::TEMPERATURE;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::models::ResolvedFood;
use crate::query::QueryParser;
use crate::resolver::MacroResolver;

const EMPTY_MESSAGE_REPLY: &str =
    "Tell me your goal, e.g. lose fat, gain muscle, or ask for a meal idea.";

const DEFAULT_REPLY: &str = "I can help with macros, meal ideas, cutting/bulking tips. Try: \
     'high protein breakfast', 'cutting diet tips', or 'carb sources before workout'.";

/// Words that mark a message as a macro question
const NUTRITION_KEYWORDS: &[&str] = &["macro", "calorie", "protein", "carb", "fat", "fiber"];

/// Keyword groups checked in order; the first group with a hit answers
const RULES: &[(&[&str], &str)] = &[
    (
        &["protein", "muscle"],
        "High-protein ideas: grilled chicken breast + veggies, greek yogurt + berries, \
         paneer/tofu stir-fry, tuna salad, eggs + oats. Aim ~1.8-2.2g protein/kg bodyweight.",
    ),
    (
        &["cutting", "deficit", "lose fat", "lose weight"],
        "Calorie deficit tips: keep protein high, eat high-volume foods (veggies, fruits), \
         prefer whole grains, hydrate, and track your macros. A moderate deficit works best.",
    ),
    (
        &["bulking", "surplus", "gain weight"],
        "Lean bulk: add 200-400 kcal/day above maintenance, keep protein ~2g/kg, \
         lift progressively, and prioritize sleep and recovery.",
    ),
    (
        &["fiber", "digestion", "constipation"],
        "Aim 25-35g fiber/day: oats, fruits, vegetables, legumes, whole grains. Hydrate well.",
    ),
    (
        &["carb", "energy"],
        "Great carb sources: rice, oats, potatoes, fruits, whole grains. Time carbs around workouts.",
    ),
    (
        &["fat", "omega"],
        "Healthy fats: olive oil, nuts, seeds, avocado, fatty fish. Keep ~20-35% calories from fat.",
    ),
];

/// Daily targets from the user's profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTargets {
    /// Calorie target
    pub target: Option<Value>,
    /// Grams per day
    pub protein: Option<Value>,
    /// Grams per day
    pub carbs: Option<Value>,
    /// Grams per day
    pub fat: Option<Value>,
    /// Grams per day
    pub fiber: Option<Value>,
}

/// Optional personalization sent with a chat message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    pub name: Option<String>,
    /// Free-text goal, e.g. "lose fat"
    pub goal: Option<String>,
    /// Daily targets
    #[serde(default)]
    pub calories: DailyTargets,
}

impl UserProfile {
    /// One-line context for the system prompt
    #[must_use]
    pub fn context_line(&self) -> String {
        let field = |value: Option<&Value>, unit: &str| match value {
            Some(Value::String(s)) => format!("{s}{unit}"),
            Some(Value::Null) | None => "unknown".to_owned(),
            Some(other) => format!("{other}{unit}"),
        };
        let targets = &self.calories;
        format!(
            "User: {}, Goal: {}, Targets -> Calories: {}, Protein: {}, Carbs: {}, Fat: {}, Fiber: {}.",
            self.name.as_deref().unwrap_or("unknown"),
            self.goal.as_deref().unwrap_or("unknown"),
            field(targets.target.as_ref(), ""),
            field(targets.protein.as_ref(), "g"),
            field(targets.carbs.as_ref(), "g"),
            field(targets.fat.as_ref(), "g"),
            field(targets.fiber.as_ref(), "g"),
        )
    }
}

/// Incoming chat message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    /// User text
    #[serde(default)]
    pub message: String,
    /// Personalization for the LLM prompt
    #[serde(default)]
    pub profile: Option<UserProfile>,
    /// Accepted from clients; not used for replies
    #[serde(default)]
    pub recent_meals: Option<Vec<Value>>,
    /// Accepted from clients; not used for replies
    #[serde(default)]
    pub last_messages: Option<Vec<Value>>,
}

/// Chat response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant text
    pub reply: String,
}

/// Format a scaled food as a one-line macro summary
#[must_use]
pub fn format_macros(food: &ResolvedFood) -> String {
    format!(
        "{} ({}g): {} cal, {:.1}g protein, {:.1}g carbs, {:.1}g fat, {:.1}g fiber.",
        food.name, food.grams, food.calories, food.protein, food.carbs, food.fat, food.fiber
    )
}

/// Keyword-rule reply for a lowercased message
#[must_use]
pub fn rule_based_reply(text: &str) -> &'static str {
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map_or(DEFAULT_REPLY, |(_, reply)| reply)
}

/// Chat front end over the resolver and an optional LLM
pub struct NutritionAssistant {
    resolver: Arc<MacroResolver>,
    llm: Option<Arc<dyn LlmProvider>>,
}

impl NutritionAssistant {
    /// Assistant answering from `resolver`, with `llm` for open questions
    #[must_use]
    pub fn new(resolver: Arc<MacroResolver>, llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { resolver, llm }
    }

    /// Reply to one chat message
    pub async fn reply(&self, turn: &ChatTurn) -> ChatReply {
        let text = turn.message.trim().to_lowercase();
        if text.is_empty() {
            return ChatReply {
                reply: EMPTY_MESSAGE_REPLY.to_owned(),
            };
        }

        if let Some(answer) = self.macro_answer(&text).await {
            return ChatReply { reply: answer };
        }

        if let Some(answer) = self.llm_answer(turn).await {
            return ChatReply { reply: answer };
        }

        ChatReply {
            reply: rule_based_reply(&text).to_owned(),
        }
    }

    async fn macro_answer(&self, text: &str) -> Option<String> {
        if !NUTRITION_KEYWORDS.iter().any(|k| text.contains(k)) {
            return None;
        }
        let parsed = QueryParser::new(self.resolver.catalog()).parse(text);
        let food = parsed.food?;
        debug!(food = %food, grams = parsed.grams, "Answering macro question");
        let resolved = self.resolver.resolve(&food, parsed.grams).await.into_food()?;
        Some(format_macros(&resolved))
    }

    async fn llm_answer(&self, turn: &ChatTurn) -> Option<String> {
        let llm = self.llm.as_ref()?;

        let mut system = String::from("You are BiteWise AI, a trusted fitness & nutrition assistant.\n");
        if let Some(profile) = &turn.profile {
            system.push_str("Context: ");
            system.push_str(&profile.context_line());
            system.push('\n');
        }
        system.push_str(
            "Be accurate and concise. Prefer evidence-based advice. Include macros when relevant.",
        );

        let request = ChatRequest::new(vec![
            ChatMessage::system(system),
            ChatMessage::user(turn.message.clone()),
        ])
        .with_temperature(TEMPERATURE);

        match llm.complete(&request).await {
            Ok(response) if !response.content.trim().is_empty() => {
                debug!(provider = llm.name(), model = %response.model, "LLM answered chat message");
                Some(response.content)
            }
            Ok(_) => {
                debug!(provider = llm.name(), "LLM returned empty content");
                None
            }
            Err(e) => {
                warn!(provider = llm.name(), error = %e, "LLM completion failed, using rules");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MacroSet;

    #[test]
    fn test_format_macros() {
        let food = ResolvedFood::from_per_100g(
            "Chicken Breast".to_owned(),
            150,
            &MacroSet::new(165.0, 31.0, 0.0, 3.6, 0.0),
        );
        assert_eq!(
            format_macros(&food),
            "Chicken Breast (150g): 248 cal, 46.5g protein, 0.0g carbs, 5.4g fat, 0.0g fiber."
        );
    }

    #[test]
    fn test_rule_order() {
        assert!(rule_based_reply("build muscle").starts_with("High-protein"));
        assert!(rule_based_reply("i am cutting").starts_with("Calorie deficit"));
        assert!(rule_based_reply("bulking plan").starts_with("Lean bulk"));
        assert!(rule_based_reply("omega 3").starts_with("Healthy fats"));
        assert_eq!(rule_based_reply("hello"), DEFAULT_REPLY);
    }

    #[test]
    fn test_profile_context() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "name": "Sam",
            "goal": "gain muscle",
            "calories": {"target": 2500, "protein": 160}
        }))
        .unwrap();
        let line = profile.context_line();
        assert!(line.starts_with("User: Sam, Goal: gain muscle"));
        assert!(line.contains("Calories: 2500"));
        assert!(line.contains("Protein: 160g"));
        assert!(line.contains("Fat: unknown,"));
    }
}
