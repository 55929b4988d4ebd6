//! Client clock handling for in-progress interviews.

use intervu_types::interview::Language;

/// Remaining time at which the wrap-up is triggered.
pub const TIME_WARNING_MS: i64 = 180_000;

const PERSIST_INTERVAL_MS: i64 = 30_000;
const TICK_WINDOW_MS: i64 = 1_000;

/// Whether a clock tick should be written to storage (about every 30 s).
pub fn should_persist_remaining_time(remaining_ms: i64) -> bool {
    remaining_ms.rem_euclid(PERSIST_INTERVAL_MS) < TICK_WINDOW_MS
}

/// Whether this tick falls in the one-second window at the three-minute mark.
pub fn crosses_time_warning(remaining_ms: i64) -> bool {
    remaining_ms <= TIME_WARNING_MS && remaining_ms > TIME_WARNING_MS - TICK_WINDOW_MS
}

/// System instruction asking the interviewer to wrap up without saying why.
pub fn time_running_out_instruction(language: Language) -> &'static str {
    match language {
        Language::PtBr => {
            "O tempo da entrevista está acabando. Por favor, faça sua pergunta final e \
             prepare-se para encerrar a entrevista graciosamente. Não mencione que o tempo está \
             acabando, simplesmente formule sua pergunta final de forma natural."
        }
        Language::EnUs => {
            "The interview time is running out. Please ask your final question and prepare to \
             gracefully end the interview. Don't mention that time is running out, just \
             naturally formulate your final question."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_window() {
        assert!(should_persist_remaining_time(900_000));
        assert!(should_persist_remaining_time(870_999));
        assert!(!should_persist_remaining_time(871_000));
        assert!(should_persist_remaining_time(0));
    }

    #[test]
    fn test_warning_window() {
        assert!(crosses_time_warning(180_000));
        assert!(crosses_time_warning(179_001));
        assert!(!crosses_time_warning(179_000));
        assert!(!crosses_time_warning(180_001));
    }

    #[test]
    fn test_instruction_language() {
        assert!(time_running_out_instruction(Language::PtBr).starts_with("O tempo"));
        assert!(time_running_out_instruction(Language::EnUs).starts_with("The interview time"));
    }
}
