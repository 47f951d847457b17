use dnotation_roll::{
    systems::{d10::D10PoolRoll, d6::D6PoolRoll},
    DNotationResult, GlitchStatus,
};

pub fn expression(result: &DNotationResult) -> String {
    format!("{} = {}", result.str_value, result.value)
}

pub fn d6_pool(rolled: &D6PoolRoll) -> String {
    let mut text = format!(
        "{} dice: {} => {} hits",
        rolled.expression.value,
        rolled.roll,
        rolled.roll.value()
    );
    match rolled.status {
        GlitchStatus::None => {}
        GlitchStatus::Glitch => text.push_str(" (glitch)"),
        GlitchStatus::CriticalGlitch => text.push_str(" (critical glitch)"),
    }
    text
}

pub fn d10_pool(rolled: &D10PoolRoll) -> String {
    let mut text = if rolled.chance {
        format!("chance die: {}", rolled.roll)
    } else {
        format!("{} dice: {}", rolled.pool, rolled.roll)
    };
    text.push_str(&format!(" => {} successes", rolled.roll.value()));
    if rolled.status == GlitchStatus::CriticalGlitch {
        text.push_str(" (dramatic failure)");
    }
    text
}

#[cfg(test)]
mod tests {

    use super::*;
    use dnotation_roll::{systems, BaseRoller, ScriptedSource};

    #[test]
    fn test_render_expression() {
        assert_eq!(
            expression(&DNotationResult {
                value: 8,
                str_value: "[3 + 3 + 2]".to_string()
            }),
            "[3 + 3 + 2] = 8"
        );
    }

    #[test]
    fn test_render_d6() {
        let roller = BaseRoller::new(ScriptedSource::new(vec![1, 1, 1, 5]));
        let rolled = systems::d6::roll_pool_expression(&roller, "4").unwrap();
        assert_eq!(d6_pool(&rolled), "4 dice: 1 1 1 5 => 1 hits (glitch)");
    }

    #[test]
    fn test_render_d10() {
        let roller = BaseRoller::new(ScriptedSource::new(vec![10, 3, 8]));
        let rolled = systems::d10::roll_pool(&roller, &["2"]).unwrap();
        assert_eq!(d10_pool(&rolled), "2 dice: 10 (3) 8 => 2 successes");

        let roller = BaseRoller::new(ScriptedSource::new(vec![1]));
        let rolled = systems::d10::roll_pool(&roller, &["chance"]).unwrap();
        assert_eq!(
            d10_pool(&rolled),
            "chance die: 1 => 0 successes (dramatic failure)"
        );
    }
}
