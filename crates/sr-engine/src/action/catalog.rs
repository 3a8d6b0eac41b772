//! The standard action table and its compiled lookup.

use super::{
    ActionBody, ActionKind, ActionSpec, FlatBase, FlatMode, FlatSpec, FlatStep, PoolSpec, RankField,
    RankGate, RankLine, RankUse, RankValue, RollSpec, SplitMode, SplitRule, SuccessCheck,
    TargetText, TriggerBonus,
};
use crate::crit::{CritFaces, TierRules};
use crate::dice::{Die, Keep};
use crate::error::{EngineError, EngineResult};
use crate::rank::{ByRank, Rank};
use crate::trigger::common::{self, PassiveKind};
use crate::trigger::{Capture, ExclusiveGroup, TriggerDef, TriggerVocabulary};

// Action-specific triggers.

const MELEE: TriggerDef = TriggerDef::flag("melee", "Melee", r"\bmelee\b");
const ULTRA: TriggerDef = TriggerDef::flag("ultra", "Ultra", r"\bultra\b");
const RADIAL: TriggerDef = TriggerDef::flag("radial", "Radial", r"\bradial\b");
const FULL_COVER: TriggerDef = TriggerDef::flag("full_cover", "Full Cover", r"\bfull\s*cover\b");
const PARTIAL_COVER: TriggerDef =
    TriggerDef::flag("partial_cover", "Partial Cover", r"\bpartial\s*cover\b");
const FRENZY: TriggerDef = TriggerDef::flag("frenzy", "Frenzy", r"\bfrenzy\b");
const BLITZ: TriggerDef = TriggerDef::flag("blitz", "Blitz", r"\bblitz\b");
const CHALLENGE: TriggerDef = TriggerDef::flag("challenge", "Challenge", r"\bchallenge\b");
const SPLASH: TriggerDef = TriggerDef::flag("splash", "Splash Damage", r"\bsplash(?:\s*damage)?\b");
const SNIPE: TriggerDef = TriggerDef::flag("snipe", "Snipe", r"\bsnipe\b");
const CLEANSE: TriggerDef = TriggerDef::flag("cleanse", "Cleanse", r"\bcleanse\b");
const STABILIZE: TriggerDef = TriggerDef::flag("stabilize", "Stabilize", r"\bstabili[sz]e\b");

const TAKEN: TriggerDef = TriggerDef::captured(
    "taken",
    "Taken-damage",
    r"\btaken[-\s]*damage\s*\(\s*([^)]*?)\s*\)",
    r"\btaken[-\s]*damage\b",
    Capture::Number,
    "Taken-damage (37)",
);
const TARGET: TriggerDef = TriggerDef::captured(
    "target",
    "Target",
    r"\btarget\s*\(([^)]*)\)",
    r"\btarget\s*\(",
    Capture::Text,
    "Target (Goblin)",
);
const SPEED: TriggerDef = TriggerDef::captured(
    "speed",
    "Speed",
    r"\bspeed\s*\(\s*([^)]*?)\s*\)",
    r"\bspeed\b",
    Capture::Integer,
    "Speed (5)",
);
const OD_DAMAGE: TriggerDef = TriggerDef::captured(
    "od_damage",
    "OD-damage",
    r"\bod[-\s]*damage\s*\(\s*([^)]*?)\s*\)",
    r"\bod[-\s]*damage\b",
    Capture::Number,
    "OD-damage (120)",
);
const MAX_HP: TriggerDef = TriggerDef::captured(
    "max_hp",
    "MaxHP",
    r"\bmax\s*hp\s*\(\s*([^)]*?)\s*\)",
    r"\bmax\s*hp\b",
    Capture::Number,
    "MaxHP (120)",
);

// Pools.

const ONE_D100: &[PoolSpec] = &[PoolSpec::plain(Die::D100, 1, Some(CritFaces::PERCENTILE))];
const TWO_D100: &[PoolSpec] = &[PoolSpec::plain(Die::D100, 2, Some(CritFaces::PERCENTILE))];

const SHARP_POOLS: &[PoolSpec] = &[PoolSpec {
    die: Die::D100,
    count: ByRank([2; 6]),
    explode_at: None,
    keep: Keep::Highest(1),
    crit: Some(CritFaces::PERCENTILE),
    face_notes: &[],
}];

const RECKLESS_POOLS: &[PoolSpec] = &[
    PoolSpec {
        die: Die::D200,
        count: ByRank([1; 6]),
        explode_at: None,
        keep: Keep::All,
        crit: Some(CritFaces::D200),
        face_notes: &[
            (200, "► d200=200 triggers STAR BREAKER."),
            (100, "► d200=100 counted as a 100 for crit checks."),
            (1, "► d200=1 counted as a 1 for crit checks."),
        ],
    },
    PoolSpec {
        die: Die::D100,
        count: ByRank([1, 1, 1, 2, 2, 1]),
        explode_at: None,
        keep: Keep::All,
        crit: Some(CritFaces::PERCENTILE),
        face_notes: &[],
    },
    PoolSpec {
        die: Die::D100,
        count: ByRank([0, 0, 0, 0, 0, 2]),
        explode_at: None,
        keep: Keep::Highest(1),
        crit: Some(CritFaces::PERCENTILE),
        face_notes: &[],
    },
];

const STABLE_POOLS: &[PoolSpec] = &[PoolSpec {
    die: Die::D20,
    count: ByRank([7; 6]),
    explode_at: Some(ByRank([17; 6])),
    keep: Keep::All,
    crit: None,
    face_notes: &[],
}];

const BURST_POOLS: &[PoolSpec] = &[PoolSpec {
    die: Die::D20,
    count: ByRank([12, 12, 12, 13, 13, 14]),
    explode_at: Some(ByRank([16; 6])),
    keep: Keep::All,
    crit: None,
    face_notes: &[],
}];

const HEAL_POOLS: &[PoolSpec] = &[PoolSpec {
    die: Die::D20,
    count: ByRank([2; 6]),
    explode_at: Some(ByRank([20, 19, 19, 18, 18, 17])),
    keep: Keep::All,
    crit: None,
    face_notes: &[],
}];

const POWER_HEAL_EXPLODE: ByRank<i64> = ByRank([20, 18, 18, 17, 17, 16]);

const POWER_HEAL_POOLS: &[PoolSpec] = &[PoolSpec {
    die: Die::D20,
    count: ByRank([4; 6]),
    explode_at: Some(ByRank([20, 18, 18, 17, 17, 16])),
    keep: Keep::All,
    crit: None,
    face_notes: &[],
}];

// Splits.

const HEAL_SPLIT: SplitRule = SplitRule {
    modes: &[
        SplitMode {
            trigger: Some("simulcast"),
            label: Some("Simulcast"),
            divisor: 2,
            per_charge: None,
            recipients: "1 of the 2 targets",
        },
        SplitMode {
            trigger: Some("versatile"),
            label: Some("Versatile"),
            divisor: 2,
            per_charge: None,
            recipients: "2 allies",
        },
        SplitMode {
            trigger: Some("aoe"),
            label: Some("AoE"),
            divisor: 3,
            per_charge: None,
            recipients: "3 allies",
        },
    ],
    default: SplitMode {
        trigger: None,
        label: None,
        divisor: 1,
        per_charge: None,
        recipients: "1 ally",
    },
};

const BUFF_MODES: &[SplitMode] = &[
    SplitMode {
        trigger: Some("simulcast"),
        label: Some("Simulcast"),
        divisor: 2,
        per_charge: None,
        recipients: "1 of the 2 targets",
    },
    SplitMode {
        trigger: Some("versatile"),
        label: Some("Versatile"),
        divisor: 2,
        per_charge: None,
        recipients: "2 targets",
    },
    SplitMode {
        trigger: Some("aoe"),
        label: Some("AoE"),
        divisor: 3,
        per_charge: None,
        recipients: "3 targets",
    },
];

const BUFF_SPLIT: SplitRule = SplitRule {
    modes: BUFF_MODES,
    default: SplitMode {
        trigger: None,
        label: None,
        divisor: 3,
        per_charge: Some(ByRank([0, 5, 5, 8, 8, 10])),
        recipients: "1 target (3 charges)",
    },
};

const POWER_BUFF_SPLIT: SplitRule = SplitRule {
    modes: BUFF_MODES,
    default: SplitMode {
        trigger: None,
        label: None,
        divisor: 3,
        per_charge: Some(ByRank([0, 5, 8, 10, 12, 15])),
        recipients: "1 target (3 charges)",
    },
};

// Rolled bodies.

const fn attack_body(pools: &'static [PoolSpec], lines: &'static [RankLine]) -> RollSpec {
    RollSpec {
        pools,
        tiers: Some(TierRules::DOUBLING),
        show_multiplier: false,
        success: None,
        bonuses: &[],
        risky: false,
        split: None,
        passive: PassiveKind::Attack,
        unit: "damage",
        lines,
    }
}

const fn dice_body(pools: &'static [PoolSpec], lines: &'static [RankLine]) -> RollSpec {
    RollSpec {
        tiers: None,
        unit: "total",
        ..attack_body(pools, lines)
    }
}

const PROTECT_LINES: &[RankLine] = &[RankLine {
    template: "► ***Action.*** Make an attack and grant yourself or an ally within range the Protected State.",
    value: RankValue::Fixed(0),
}];

const ULTRAPROTECT_LINES: &[RankLine] = &[RankLine {
    template: "► ***Special Action.*** Make an attack and grant up to 3 allies within range the Protected State. You are *Vulnerable*.",
    value: RankValue::Fixed(0),
}];

const COUNTER_LINES: &[RankLine] = &[RankLine {
    template: "► ***Action.*** Make an attack and distribute **{n}** ({rank}) mitigation between and up to 3 targets in multiples of 5.",
    value: RankValue::Table(ByRank([0, 10, 15, 20, 25, 30])),
}];

const VULNERABLE: &[RankLine] = &[RankLine {
    template: "► Status. You are vulnerable.",
    value: RankValue::Fixed(0),
}];

const HEAL_LINES: &[RankLine] = &[RankLine {
    template: "► Free Action: Healing Cleanse. Whenever you heal, cleanse 1 curable condition from an ally within range.",
    value: RankValue::Fixed(0),
}];

const POWER_HEAL_LINES: &[RankLine] = &[
    RankLine {
        template: "► Explosions occur on {n}+ rolls.",
        value: RankValue::Table(POWER_HEAL_EXPLODE),
    },
    RankLine {
        template: "► You are vulnerable.",
        value: RankValue::Fixed(0),
    },
    RankLine {
        template: "► Free Action: Power Healing Cleanse. After healing, cleanse **{n}** ({rank}-rank) curable conditions from between and up to 3 allies within range. Add **5** per unused cleanse charge to your heal amount.",
        value: RankValue::Table(ByRank([1, 2, 2, 3, 3, 4])),
    },
];

const ULTRACOUNTER_BODY: RollSpec = RollSpec {
    success: Some(SuccessCheck {
        label: "ctr dmg",
        threshold: RankValue::Field(RankField::CounterCheck),
        on_success: RankValue::Field(RankField::CounterDmg),
        on_failure: 0,
        success_tag: Some("counter!"),
        failure_tag: Some("vulnerable"),
        success_line: "► Successful counter on {threshold}+! {bonus} damage added. Vulnerability negated.",
        failure_line: "► Failed counter (need {threshold}+). 0 damage added. You are vulnerable.",
    }),
    bonuses: &[TriggerBonus {
        trigger: "melee",
        label: "melee",
        value: RankValue::Fixed(30),
        active_line: Some("► Melee triggered. 30 damage added."),
        inactive_line: Some(
            "► Melee not triggered. If you are on or adjacent to the target's space, add 30 damage manually.",
        ),
    }],
    ..attack_body(ONE_D100, &[])
};

const SNEAK_BODY: RollSpec = RollSpec {
    success: Some(SuccessCheck {
        label: "sneak",
        threshold: RankValue::Table(ByRank([40, 35, 30, 30, 25, 25])),
        on_success: RankValue::Table(ByRank([10, 25, 25, 30, 35, 40])),
        on_failure: 10,
        success_tag: Some("sneak successful!"),
        failure_tag: None,
        success_line: "► Success on {threshold}+: {bonus} sneak damage added ({rank}-ranked mastery).",
        failure_line: "► Missed the {threshold}+ check: 10 sneak damage added.",
    }),
    tiers: None,
    unit: "total",
    ..attack_body(ONE_D100, &[])
};

const CRITICAL_BODY: RollSpec = RollSpec {
    tiers: Some(TierRules::CRITICAL),
    show_multiplier: true,
    unit: "total",
    ..attack_body(TWO_D100, &[])
};

const SHARP_BODY: RollSpec = RollSpec {
    risky: true,
    unit: "total",
    ..attack_body(SHARP_POOLS, &[])
};

const RECKLESS_BODY: RollSpec = RollSpec {
    risky: true,
    unit: "total",
    ..attack_body(RECKLESS_POOLS, VULNERABLE)
};

const fn support_body(
    pools: &'static [PoolSpec],
    tiers: Option<TierRules>,
    split: SplitRule,
    unit: &'static str,
    lines: &'static [RankLine],
) -> RollSpec {
    RollSpec {
        pools,
        tiers,
        show_multiplier: false,
        success: None,
        bonuses: &[],
        risky: false,
        split: Some(split),
        passive: PassiveKind::Support,
        unit,
        lines,
    }
}

// Actions.

const fn rolled(
    key: &'static str,
    aliases: &'static [&'static str],
    title: &'static str,
    kind: ActionKind,
    summary: &'static str,
    body: RollSpec,
) -> ActionSpec {
    ActionSpec {
        key,
        aliases,
        title,
        kind,
        summary,
        ranks: RankUse::MasteryAndWeapon,
        gates: &[],
        triggers: &[],
        groups: &[],
        requires_one_of: &[],
        body: ActionBody::Rolled(body),
    }
}

const fn flat(
    key: &'static str,
    title: &'static str,
    kind: ActionKind,
    summary: &'static str,
    body: FlatSpec,
) -> ActionSpec {
    ActionSpec {
        key,
        aliases: &[],
        title,
        kind,
        summary,
        ranks: RankUse::Mastery,
        gates: &[],
        triggers: &[],
        groups: &[],
        requires_one_of: &[],
        body: ActionBody::Flat(body),
    }
}

const fn rank_text(values: [i64; 6], modes: &'static [FlatMode]) -> FlatSpec {
    FlatSpec {
        base: FlatBase::Rank(RankValue::Table(ByRank(values))),
        steps: &[],
        target: None,
        modes,
    }
}

const fn gate_d(label: &'static str) -> RankGate {
    RankGate::always(label, Rank::D)
}

const GATE_LETHAL: &[RankGate] = &[gate_d("Lethal")];
const GATE_BLESSED: &[RankGate] = &[gate_d("Blessed")];
const GATE_STURDY: &[RankGate] = &[gate_d("Sturdy")];
const GATE_HASTE: &[RankGate] = &[gate_d("Haste")];
const GATE_INSPIRE: &[RankGate] = &[gate_d("Inspire")];
const GATE_CLEANSE: &[RankGate] = &[gate_d("Cleanse")];
const GATE_MARK: &[RankGate] = &[gate_d("Mark")];
const GATE_OVERDRIVE: &[RankGate] = &[gate_d("Overdrive")];

const TORMENT: ActionSpec = ActionSpec {
    triggers: &[ULTRA, RADIAL],
    groups: &[ExclusiveGroup {
        members: &["ultra", "radial"],
    }],
    ..flat(
        "torment",
        "Torment",
        ActionKind::SubAction,
        "Rank-scaled damage to adjacent enemies; ultra doubles, radial spreads.",
        FlatSpec {
            base: FlatBase::Rank(RankValue::Table(ByRank([0, 5, 10, 15, 20, 25]))),
            steps: &[FlatStep::Multiply {
                factor: 2,
                when: Some("ultra"),
                label: "Ultra",
            }],
            target: None,
            modes: &[
                FlatMode {
                    when: Some("ultra"),
                    title: "Ultra Torment",
                    lines: &[
                        "**Bonus Action.** Deal **{X} damage** to 1 adjacent enemy.",
                        "► Ultra Torment activated. Torment damage doubled.",
                    ],
                },
                FlatMode {
                    when: Some("radial"),
                    title: "Radial Torment",
                    lines: &[
                        "**Bonus Action.** Deal **{X} damage** to all adjacent enemies.",
                        "► Radial Torment activated. All adjacent or melee enemies take torment damage.",
                    ],
                },
                FlatMode {
                    when: None,
                    title: "Torment",
                    lines: &["**Free Action.** Deal **{X} damage** to 1 adjacent enemy."],
                },
            ],
        },
    )
};

const COVER: ActionSpec = ActionSpec {
    ranks: RankUse::None,
    triggers: &[FULL_COVER, PARTIAL_COVER],
    groups: &[ExclusiveGroup {
        members: &["full_cover", "partial_cover"],
    }],
    requires_one_of: &["full_cover", "partial_cover"],
    ..flat(
        "cover",
        "Cover",
        ActionKind::SubAction,
        "Take full or half of an ally's next damage.",
        FlatSpec {
            base: FlatBase::None,
            steps: &[],
            target: None,
            modes: &[
                FlatMode {
                    when: Some("full_cover"),
                    title: "Cover (Full)",
                    lines: &["**Bonus Action.** Take the full damage dealt to your target after modifiers the next time they take damage."],
                },
                FlatMode {
                    when: Some("partial_cover"),
                    title: "Cover (Partial)",
                    lines: &["**Bonus Action.** Take half of the damage dealt to your target after modifiers the next time they take damage. Your target takes half."],
                },
            ],
        },
    )
};

const RAGE: ActionSpec = ActionSpec {
    gates: &[RankGate {
        label: "Rage",
        minimum: Rank::D,
        when: None,
        waived_by: Some("frenzy"),
    }],
    triggers: &[TAKEN, FRENZY],
    ..flat(
        "rage",
        "Rage",
        ActionKind::SubAction,
        "Return taken damage, capped by rank; frenzy doubles and lifts the cap.",
        FlatSpec {
            base: FlatBase::Input {
                trigger: "taken",
                label: "Taken-damage",
                required: true,
                placeholder: "0",
                example: "Taken-damage (37)",
            },
            steps: &[
                FlatStep::Multiply {
                    factor: 2,
                    when: Some("frenzy"),
                    label: "Frenzy",
                },
                FlatStep::Cap {
                    cap: ByRank([0, 25, 50, 75, 100, 125]),
                    unless: Some("frenzy"),
                },
            ],
            target: None,
            modes: &[
                FlatMode {
                    when: Some("frenzy"),
                    title: "Rage (Frenzy)",
                    lines: &["► **Bonus Action: Frenzied Rage.** Deal **{X} damage** to an enemy you share a space with or are adjacent to, based on your taken damage (doubled and uncapped this cycle)."],
                },
                FlatMode {
                    when: None,
                    title: "Rage",
                    lines: &["► **Free Action.** Deal **{X} damage** to an enemy you share a space with or are adjacent to, based on your taken damage (max {cap}, MR⋅{rank})."],
                },
            ],
        },
    )
};

const MARK: ActionSpec = ActionSpec {
    gates: GATE_MARK,
    triggers: &[TARGET],
    ..flat(
        "mark",
        "Mark",
        ActionKind::SubAction,
        "Mark a target; the next two attacks against it gain a damage modifier.",
        FlatSpec {
            base: FlatBase::Rank(RankValue::Table(ByRank([0, 10, 15, 20, 25, 30]))),
            steps: &[],
            target: Some(TargetText {
                trigger: "target",
                default: "your marked enemy",
            }),
            modes: &[FlatMode {
                when: None,
                title: "Mark",
                lines: &["► **Bonus Action.** The next **2 attacks** against **{target}** gain a **+{X}** (MR⋅{rank}) damage modifier. You cannot recast Mark until all charges are spent."],
            }],
        },
    )
};

const MOMENTUM: ActionSpec = ActionSpec {
    gates: &[RankGate {
        label: "Blitz",
        minimum: Rank::B,
        when: Some("blitz"),
        waived_by: None,
    }],
    triggers: &[SPEED, BLITZ],
    ..flat(
        "momentum",
        "Momentum",
        ActionKind::SubAction,
        "Attack bonus from speed; blitz doubles it.",
        FlatSpec {
            base: FlatBase::Input {
                trigger: "speed",
                label: "Speed",
                required: false,
                placeholder: "X",
                example: "Speed (5)",
            },
            steps: &[
                FlatStep::Multiply {
                    factor: 5,
                    when: None,
                    label: "",
                },
                FlatStep::Multiply {
                    factor: 2,
                    when: Some("blitz"),
                    label: "Blitz",
                },
            ],
            target: None,
            modes: &[
                FlatMode {
                    when: Some("blitz"),
                    title: "Momentum (Blitz)",
                    lines: &["► **Bonus Action: Blitz.** Gain a +{X} attack bonus this cycle when you spend your movements and end your turn on or adjacent to your enemy."],
                },
                FlatMode {
                    when: None,
                    title: "Momentum",
                    lines: &["► **Free Action.** Gain a +{X} attack bonus this cycle."],
                },
            ],
        },
    )
};

const OVERDRIVE: ActionSpec = ActionSpec {
    gates: GATE_OVERDRIVE,
    triggers: &[OD_DAMAGE],
    ..flat(
        "overdrive",
        "Overdrive",
        ActionKind::Passive,
        "Recover HP from overdrive damage dealt, capped by rank.",
        FlatSpec {
            base: FlatBase::Input {
                trigger: "od_damage",
                label: "OD-damage",
                required: false,
                placeholder: "X",
                example: "OD-damage (120)",
            },
            steps: &[
                FlatStep::Divide {
                    divisor: ByRank([12, 12, 12, 12, 12, 10]),
                },
                FlatStep::Cap {
                    cap: ByRank([0, 25, 30, 35, 40, 50]),
                    unless: None,
                },
            ],
            target: None,
            modes: &[FlatMode {
                when: None,
                title: "Overdrive",
                lines: &["► ***Passive.*** Gain **{X} HP** (max {cap}, MR⋅{rank}) from the overdrive damage you dealt this cycle."],
            }],
        },
    )
};

const DUELIST: ActionSpec = ActionSpec {
    triggers: &[CHALLENGE],
    ..flat(
        "duelist",
        "Duelist",
        ActionKind::SubAction,
        "Damage against your duel target; challenge doubles it as a buff.",
        FlatSpec {
            base: FlatBase::Rank(RankValue::Table(ByRank([0, 15, 15, 20, 20, 25]))),
            steps: &[FlatStep::Multiply {
                factor: 2,
                when: Some("challenge"),
                label: "Challenge",
            }],
            target: None,
            modes: &[
                FlatMode {
                    when: Some("challenge"),
                    title: "Duelist (Challenge)",
                    lines: &[
                        "**Bonus Action.** Your passive damage is doubled and must be used as an attack buff against your passive target.",
                        "► Challenge activated: gain **{X}** (MR⋅{rank}) as a damage buff if you attack an enemy on or adjacent to their space.",
                    ],
                },
                FlatMode {
                    when: None,
                    title: "Duelist",
                    lines: &["► ***Passive.*** If you attack an enemy on or adjacent to their space, deal an instance of **{X}** (MR⋅{rank}) damage to them."],
                },
            ],
        },
    )
};

const AREA_EFFECT: ActionSpec = ActionSpec {
    aliases: &["area"],
    triggers: &[SPLASH],
    ..flat(
        "areaeffect",
        "Area Effect",
        ActionKind::SubAction,
        "Spread attack damage; splash hits every enemy next to the target.",
        rank_text(
            [0, 15, 15, 20, 20, 25],
            &[
                FlatMode {
                    when: Some("splash"),
                    title: "Area Effect (Splash Damage)",
                    lines: &[
                        "**Bonus Action.** Deal an instance of **{X}** (MR⋅{rank}) damage to all enemies adjacent to your attack target. Take only the highest retaliation damage, if any.",
                        "► ***Passive.*** Your attack's damage may be distributed in any amount to any enemies on or adjacent to the target.",
                    ],
                },
                FlatMode {
                    when: None,
                    title: "Area Effect",
                    lines: &["► ***Passive.*** Your attack's damage may be distributed in any amount to any enemies on or adjacent to the target. Take only the highest retaliation damage, if any."],
                },
            ],
        ),
    )
};

const SHARPSHOOTER: ActionSpec = ActionSpec {
    triggers: &[SNIPE],
    ..flat(
        "sharpshooter",
        "Sharpshooter",
        ActionKind::SubAction,
        "Ranged damage buff; snipe rolls 1d3 for a bigger one.",
        FlatSpec {
            base: FlatBase::Rank(RankValue::Table(ByRank([0, 5, 5, 10, 10, 15]))),
            steps: &[FlatStep::Gamble {
                when: "snipe",
                die: Die::D3,
                succeed_at: 2,
                table: ByRank([0, 15, 15, 30, 30, 40]),
                success_line: "► 1d3 ({roll}). Focus maintained. Snipe triggered.",
                failure_line: "► 1d3 ({roll}). Focus lost. Snipe does not trigger.",
            }],
            target: None,
            modes: &[
                FlatMode {
                    when: Some("snipe"),
                    title: "Sharpshooter (Snipe)",
                    lines: &[
                        "**Bonus Action.** Maintain focus to empower your ranged attack.",
                        "► ***Passive.*** If you attack an enemy while not in their space, gain **{X}** (MR⋅{rank}) as a damage buff.",
                    ],
                },
                FlatMode {
                    when: None,
                    title: "Sharpshooter",
                    lines: &["► ***Passive.*** If you attack an enemy while not in their space, gain **{X}** (MR⋅{rank}) as a damage buff."],
                },
            ],
        },
    )
};

const LETHAL: ActionSpec = ActionSpec {
    gates: GATE_LETHAL,
    ..flat(
        "lethal",
        "Lethal",
        ActionKind::Passive,
        "Flat attack modifier by rank.",
        rank_text(
            [0, 5, 10, 15, 20, 25],
            &[FlatMode {
                when: None,
                title: "Lethal",
                lines: &["► **Passive.** All attack actions gain **+{X}** extra attack modifier (MR⋅{rank})."],
            }],
        ),
    )
};

const BLESSED: ActionSpec = ActionSpec {
    gates: GATE_BLESSED,
    ..flat(
        "blessed",
        "Blessed",
        ActionKind::Passive,
        "Flat heal and buff modifier by rank.",
        rank_text(
            [0, 5, 10, 15, 20, 25],
            &[FlatMode {
                when: None,
                title: "Blessed",
                lines: &["► **Passive.** All heal and buff actions gain **+{X}** extra modifier (MR⋅{rank})."],
            }],
        ),
    )
};

const STURDY: ActionSpec = ActionSpec {
    gates: GATE_STURDY,
    ..flat(
        "sturdy",
        "Sturdy",
        ActionKind::Passive,
        "Extra maximum HP by rank.",
        rank_text(
            [0, 30, 35, 40, 45, 50],
            &[FlatMode {
                when: None,
                title: "Sturdy",
                lines: &["► **Passive.** Gain **+{X} HP** maximum (MR⋅{rank}), capped at **+50 HP**."],
            }],
        ),
    )
};

const HASTE: ActionSpec = ActionSpec {
    gates: GATE_HASTE,
    ..flat(
        "haste",
        "Haste",
        ActionKind::SubAction,
        "Hand out extra movements.",
        rank_text(
            [0, 2, 2, 3, 3, 4],
            &[FlatMode {
                when: None,
                title: "Haste",
                lines: &["► **Bonus Action.** Distribute **{X} movements** (MR⋅{rank}) between and up to 3 targets."],
            }],
        ),
    )
};

const INSPIRE: ActionSpec = ActionSpec {
    gates: GATE_INSPIRE,
    ..flat(
        "inspire",
        "Inspire",
        ActionKind::SubAction,
        "Hand out a check or save bonus.",
        rank_text(
            [0, 5, 5, 10, 10, 15],
            &[FlatMode {
                when: None,
                title: "Inspire",
                lines: &["► **Bonus Action.** Distribute **+{X} bonus** (MR⋅{rank}) between and up to 3 targets in multiples of 5 toward a *mastery check* or *save roll*."],
            }],
        ),
    )
};

const CLEANSE_ACTION: ActionSpec = ActionSpec {
    gates: GATE_CLEANSE,
    triggers: &[CLEANSE],
    ..flat(
        "cleanse",
        "Cure",
        ActionKind::SubAction,
        "Remove curable condition stacks.",
        rank_text(
            [0, 2, 2, 4, 4, 6],
            &[
                FlatMode {
                    when: Some("cleanse"),
                    title: "Cleanse",
                    lines: &[
                        "► ***Passive: Cure.*** If you are afflicted with a curable condition, you may remove **1 stack** from yourself each cycle before it takes effect.",
                        "► **Bonus Action: Cleanse.** Remove **{X} stacks** (MR⋅{rank}) of curable conditions between and up to 3 targets.",
                    ],
                },
                FlatMode {
                    when: None,
                    title: "Cure",
                    lines: &["► ***Passive: Cure.*** If you are afflicted with a curable condition, you may remove **1 stack** from yourself each cycle before it takes effect."],
                },
            ],
        ),
    )
};

const REVIVE: ActionSpec = ActionSpec {
    ranks: RankUse::None,
    triggers: &[TARGET, MAX_HP, STABILIZE],
    ..flat(
        "revive",
        "Revive",
        ActionKind::SubAction,
        "Revive or stabilize an ally at half their maximum HP.",
        FlatSpec {
            base: FlatBase::Input {
                trigger: "max_hp",
                label: "MaxHP",
                required: false,
                placeholder: "TARGETMAXHP",
                example: "MaxHP (120)",
            },
            steps: &[FlatStep::Divide {
                divisor: ByRank([2; 6]),
            }],
            target: Some(TargetText {
                trigger: "target",
                default: "TARGETNAME",
            }),
            modes: &[
                FlatMode {
                    when: Some("stabilize"),
                    title: "Stabilize",
                    lines: &[
                        "► **Bonus Action.** Stabilize an ally within range.",
                        "◦ **{target}** has been stabilized.",
                        "◦ **{target}** regains **{X} HP**.",
                    ],
                },
                FlatMode {
                    when: None,
                    title: "Revive",
                    lines: &[
                        "► **Bonus Action.** Revive an ally within range.",
                        "◦ **{target}** has been revived.",
                        "◦ **{target}** regains **{X} HP**.",
                    ],
                },
            ],
        },
    )
};

const ULTRACOUNTER: ActionSpec = ActionSpec {
    triggers: &[MELEE],
    ..rolled(
        "ultracounter",
        &["ucounter"],
        "Ultra Counter",
        ActionKind::SpecialAction,
        "1d100 attack; beat the counter check to add counter damage.",
        ULTRACOUNTER_BODY,
    )
};

/// Every action the engine knows, in listing order.
pub const STANDARD_ACTIONS: &[ActionSpec] = &[
    rolled(
        "attack",
        &["atk"],
        "Attack",
        ActionKind::Action,
        "1d100 attack; a natural 100 doubles.",
        attack_body(ONE_D100, &[]),
    ),
    rolled(
        "protect",
        &[],
        "Protect",
        ActionKind::Action,
        "1d100 attack that grants the Protected State.",
        attack_body(ONE_D100, PROTECT_LINES),
    ),
    rolled(
        "ultraprotect",
        &["uprotect"],
        "Ultra Protect",
        ActionKind::SpecialAction,
        "1d100 attack protecting up to 3 allies.",
        attack_body(ONE_D100, ULTRAPROTECT_LINES),
    ),
    rolled(
        "counter",
        &[],
        "Counter",
        ActionKind::Action,
        "1d100 attack with rank-scaled mitigation.",
        attack_body(ONE_D100, COUNTER_LINES),
    ),
    ULTRACOUNTER,
    rolled(
        "sneak",
        &[],
        "Sneak Attack",
        ActionKind::Action,
        "1d100 attack with a rank-scaled sneak check.",
        SNEAK_BODY,
    ),
    rolled(
        "stable",
        &[],
        "Stable Attack",
        ActionKind::Action,
        "7d20, exploding on 17+.",
        dice_body(STABLE_POOLS, &[]),
    ),
    rolled(
        "burst",
        &[],
        "Burst Attack",
        ActionKind::Action,
        "12d20 plus rank dice, exploding on 16+.",
        dice_body(BURST_POOLS, VULNERABLE),
    ),
    rolled(
        "critical",
        &["crit"],
        "Critical Attack",
        ActionKind::Action,
        "2d100 with the full crit tier table.",
        CRITICAL_BODY,
    ),
    rolled(
        "sharp",
        &[],
        "Sharp Attack",
        ActionKind::Action,
        "2d100 keep highest; risky converts modifiers into d100s.",
        SHARP_BODY,
    ),
    rolled(
        "reckless",
        &[],
        "Reckless Attack",
        ActionKind::Action,
        "1d200 plus d100s; risky converts modifiers into d100s.",
        RECKLESS_BODY,
    ),
    rolled(
        "heal",
        &[],
        "Heal",
        ActionKind::Action,
        "2d20 exploding heal, splittable across allies.",
        support_body(HEAL_POOLS, None, HEAL_SPLIT, "HP", HEAL_LINES),
    ),
    rolled(
        "powerheal",
        &["pheal"],
        "Power Heal",
        ActionKind::SpecialAction,
        "4d20 exploding heal with cleanse charges.",
        support_body(POWER_HEAL_POOLS, None, HEAL_SPLIT, "HP", POWER_HEAL_LINES),
    ),
    rolled(
        "buff",
        &[],
        "Buff",
        ActionKind::Action,
        "1d100 damage buff over 3 charges.",
        support_body(
            ONE_D100,
            Some(TierRules::DOUBLING),
            BUFF_SPLIT,
            "damage buff",
            &[],
        ),
    ),
    rolled(
        "powerbuff",
        &["pbuff"],
        "Power Buff",
        ActionKind::SpecialAction,
        "2d100 damage buff over 3 charges.",
        support_body(
            TWO_D100,
            Some(TierRules::DOUBLING),
            POWER_BUFF_SPLIT,
            "damage buff",
            &[],
        ),
    ),
    TORMENT,
    COVER,
    RAGE,
    MARK,
    MOMENTUM,
    OVERDRIVE,
    DUELIST,
    AREA_EFFECT,
    SHARPSHOOTER,
    LETHAL,
    BLESSED,
    STURDY,
    HASTE,
    INSPIRE,
    CLEANSE_ACTION,
    REVIVE,
];

/// An action with its compiled trigger vocabulary.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// The action's configuration.
    pub spec: &'static ActionSpec,
    /// Every trigger the action listens for.
    pub vocabulary: TriggerVocabulary,
}

/// Compiled action table.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

fn known(defs: &[TriggerDef], name: &str) -> bool {
    defs.iter().any(|d| d.name == name)
}

fn vocabulary_for(spec: &ActionSpec) -> EngineResult<TriggerVocabulary> {
    let mut defs = spec.triggers.to_vec();
    let mut groups = spec.groups.to_vec();
    if let ActionBody::Rolled(roll) = &spec.body {
        defs.push(common::NG);
        defs.extend(roll.passive.defs());
        if roll.split.is_some() {
            defs.extend([common::SIMULCAST, common::VERSATILE, common::AOE]);
            groups.push(common::SPLIT_GROUP);
        }
        if roll.risky {
            defs.push(common::RISKY);
        }
    }

    let referenced = spec
        .gates
        .iter()
        .flat_map(|g| g.when.into_iter().chain(g.waived_by))
        .chain(spec.requires_one_of.iter().copied());
    for name in referenced {
        if !known(&defs, name) {
            return Err(EngineError::InvalidConfig(format!(
                "action '{}' refers to unknown trigger '{name}'",
                spec.key
            )));
        }
    }

    TriggerVocabulary::new(&defs, &groups)
}

impl Catalog {
    /// Compile the standard action table.
    pub fn standard() -> EngineResult<Self> {
        Self::new(STANDARD_ACTIONS)
    }

    /// Compile `specs`, rejecting duplicate command words and bad trigger
    /// tables.
    pub fn new(specs: &'static [ActionSpec]) -> EngineResult<Self> {
        let mut entries: Vec<CatalogEntry> = Vec::with_capacity(specs.len());
        for spec in specs {
            for word in std::iter::once(spec.key).chain(spec.aliases.iter().copied()) {
                if let Some(clash) = entries.iter().find(|e| e.spec.matches(word)) {
                    return Err(EngineError::InvalidConfig(format!(
                        "command word '{word}' is used by both '{}' and '{}'",
                        clash.spec.key, spec.key
                    )));
                }
            }
            entries.push(CatalogEntry {
                spec,
                vocabulary: vocabulary_for(spec)?,
            });
        }
        Ok(Self { entries })
    }

    /// The action named by `word`, case-insensitively.
    pub fn lookup(&self, word: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.spec.matches(word))
    }

    /// Every action in listing order.
    pub fn specs(&self) -> impl Iterator<Item = &'static ActionSpec> + '_ {
        self.entries.iter().map(|e| e.spec)
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog holds no actions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_compiles() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.len(), STANDARD_ACTIONS.len());
        assert!(!catalog.is_empty());
    }

    #[test]
    fn lookup_by_key_and_alias() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.lookup("HEAL").unwrap().spec.key, "heal");
        assert_eq!(catalog.lookup("pheal").unwrap().spec.key, "powerheal");
        assert_eq!(catalog.lookup("crit").unwrap().spec.key, "critical");
        assert!(catalog.lookup("fireball").is_none());
    }

    #[test]
    fn rolled_actions_get_common_triggers() {
        let catalog = Catalog::standard().unwrap();
        let heal = &catalog.lookup("heal").unwrap().vocabulary;
        for name in ["ng", "combat_focus", "blessed", "simulcast", "versatile", "aoe"] {
            assert!(heal.def(name).is_some(), "{name}");
        }
        assert!(heal.def("risky").is_none());
        assert!(heal.def("lethal").is_none());

        let sharp = &catalog.lookup("sharp").unwrap().vocabulary;
        assert!(sharp.def("risky").is_some());
        assert!(sharp.def("lethal").is_some());
        assert!(sharp.def("aoe").is_none());
    }

    #[test]
    fn flat_actions_only_get_their_own_triggers() {
        let catalog = Catalog::standard().unwrap();
        let rage = &catalog.lookup("rage").unwrap().vocabulary;
        assert!(rage.def("taken").is_some());
        assert!(rage.def("ng").is_none());
    }

    #[test]
    fn every_key_and_alias_is_unique() {
        let catalog = Catalog::standard().unwrap();
        for spec in catalog.specs() {
            for word in std::iter::once(spec.key).chain(spec.aliases.iter().copied()) {
                let hits = catalog.specs().filter(|s| s.matches(word)).count();
                assert_eq!(hits, 1, "{word}");
            }
        }
    }

    #[test]
    fn duplicate_words_are_rejected() {
        static DUPES: [ActionSpec; 2] = [TORMENT, TORMENT];
        assert!(matches!(
            Catalog::new(&DUPES),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_gate_trigger_is_rejected() {
        static BROKEN: [ActionSpec; 1] = [ActionSpec {
            gates: &[RankGate {
                label: "Broken",
                minimum: Rank::D,
                when: Some("nope"),
                waived_by: None,
            }],
            ..HASTE
        }];
        assert!(matches!(
            Catalog::new(&BROKEN),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
