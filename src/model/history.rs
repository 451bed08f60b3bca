//! Question/answer history for the current session
//!
//! History lives in memory only. It grows by one entry per answered
//! question and is emptied as a whole by an explicit clear.

use super::chart::ChartImage;
use chrono::{DateTime, Local};

/// Answer payload: plain text or a rendered chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Graph(ChartImage),
}

impl Answer {
    /// Build an answer from the raw backend reply
    pub fn from_reply(answer: String, is_graph: bool) -> Self {
        if is_graph {
            Answer::Graph(ChartImage::from_base64(answer))
        } else {
            Answer::Text(answer)
        }
    }

    pub fn is_graph(&self) -> bool {
        matches!(self, Answer::Graph(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Answer::Text(text) => Some(text),
            Answer::Graph(_) => None,
        }
    }

    pub fn graph_image(&self) -> Option<&ChartImage> {
        match self {
            Answer::Text(_) => None,
            Answer::Graph(chart) => Some(chart),
        }
    }
}

/// A single answered question
#[derive(Debug, Clone, PartialEq)]
pub struct QaExchange {
    pub question: String,
    pub dataset: String,
    pub answer: Answer,
    pub asked_at: DateTime<Local>,
}

impl QaExchange {
    pub fn new(question: impl Into<String>, dataset: impl Into<String>, answer: Answer) -> Self {
        Self {
            question: question.into(),
            dataset: dataset.into(),
            answer,
            asked_at: Local::now(),
        }
    }

    pub fn is_graph(&self) -> bool {
        self.answer.is_graph()
    }

    pub fn text(&self) -> Option<&str> {
        self.answer.text()
    }

    pub fn graph_image(&self) -> Option<&ChartImage> {
        self.answer.graph_image()
    }

    pub fn formatted_time(&self) -> String {
        self.asked_at.format("%H:%M:%S").to_string()
    }
}

/// Ordered log of exchanges, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QaHistory {
    entries: Vec<QaExchange>,
}

impl QaHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, exchange: QaExchange) {
        self.entries.push(exchange);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[QaExchange] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&QaExchange> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_from_reply() {
        let text = Answer::from_reply("42.5".to_string(), false);
        assert!(!text.is_graph());
        assert_eq!(text.text(), Some("42.5"));
        assert!(text.graph_image().is_none());

        let graph = Answer::from_reply("iVBORw0KGgo=".to_string(), true);
        assert!(graph.is_graph());
        assert!(graph.text().is_none());
        assert_eq!(
            graph.graph_image().map(|c| c.data_uri()),
            Some("data:image/png;base64,iVBORw0KGgo=".to_string())
        );
    }

    #[test]
    fn test_history_push_and_clear() {
        let mut history = QaHistory::new();
        assert!(history.is_empty());

        for i in 0..5 {
            history.push(QaExchange::new(
                format!("q{}", i),
                "sales",
                Answer::Text(i.to_string()),
            ));
        }
        assert_eq!(history.len(), 5);
        assert_eq!(history.get(0).map(|e| e.question.as_str()), Some("q0"));
        assert_eq!(history.entries().last().map(|e| e.question.as_str()), Some("q4"));

        history.clear();
        assert!(history.is_empty());
        assert!(history.entries().last().is_none());
    }

    #[test]
    fn test_formatted_time() {
        let exchange = QaExchange::new("q", "d", Answer::Text("a".into()));
        assert_eq!(exchange.formatted_time().len(), 8);
    }
}
