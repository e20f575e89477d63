//! Integration tests for sysarch-store
//!
//! These tests drive the store and the scoring rules through the public
//! traits only.

use sysarch_domain::scoring::{
    architecture_conflicts, functional_satisfaction, functional_satisfaction_in,
    functional_shortfall,
};
use sysarch_domain::{
    CategoryAttrs, CategoryKind, Confidence, Edge, FunctionId, GoalAttrs, LevelId, ModelError,
    ModelRead, ModelStore, NamedAttrs, NewRelationship, NewVote, NodeAttrs, ProjectId,
    Relationship, RelationshipKind, ScaleAttrs, ScaleId, ScenarioAttrs, ScenarioId, Scorer,
    ScoringConfig, SystemId,
};
use sysarch_store::{MemoryStore, StoreError};

struct Fixture {
    store: MemoryStore,
    project: ProjectId,
    scale: ScaleId,
    full: LevelId,
    half: LevelId,
    none: LevelId,
}

impl Fixture {
    fn new() -> Self {
        let mut store = MemoryStore::new();
        let project = store
            .create_project(NamedAttrs::named("Naval Example"))
            .unwrap();
        let scale = store
            .add_scale(project.id, ScaleAttrs::named("Satisfiability"))
            .unwrap();
        let full = store.add_level(scale.id, "Full", 1.0).unwrap();
        let half = store.add_level(scale.id, "Half", 0.5).unwrap();
        let none = store.add_level(scale.id, "None", 0.0).unwrap();
        Self {
            store,
            project: project.id,
            scale: scale.id,
            full: full.id,
            half: half.id,
            none: none.id,
        }
    }

    fn function(&mut self, name: &str) -> FunctionId {
        self.store
            .add_function(self.project, NodeAttrs::named(name))
            .unwrap()
            .id
    }

    fn system(&mut self, name: &str) -> SystemId {
        self.store
            .add_system(self.project, NodeAttrs::named(name))
            .unwrap()
            .id
    }

    fn relate(&mut self, edge: Edge, level: LevelId) -> Relationship {
        let rel = self
            .store
            .create_relationship(NewRelationship::new(self.scale, edge))
            .unwrap();
        self.store
            .cast_vote(NewVote::new(rel.id, level).at(1))
            .unwrap();
        rel
    }

    fn requires(&mut self, requiring: FunctionId, required: FunctionId) -> Relationship {
        let full = self.full;
        self.relate(Edge::FunctionRequires { requiring, required }, full)
    }

    fn satisfies(&mut self, satisfier: SystemId, satisfied: FunctionId, level: LevelId) -> Relationship {
        self.relate(Edge::SystemSatisfies { satisfier, satisfied }, level)
    }

    fn unvoted(&mut self, edge: Edge) -> Relationship {
        self.store
            .create_relationship(NewRelationship::new(self.scale, edge))
            .unwrap()
    }

    fn scenario(&mut self, name: &str, parent: Option<ScenarioId>) -> ScenarioId {
        self.store
            .add_scenario(
                self.project,
                ScenarioAttrs {
                    name: name.into(),
                    parent,
                    ..Default::default()
                },
            )
            .unwrap()
            .id
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_scale_bounds() {
    let fx = Fixture::new();
    let scale = fx.store.scale(fx.scale).unwrap();
    assert_eq!(scale.max().unwrap(), 1.0);
    assert_eq!(scale.min().unwrap(), 0.0);
}

#[test]
fn test_empty_scale_bounds_fail() {
    let mut fx = Fixture::new();
    let empty = fx
        .store
        .add_scale(fx.project, ScaleAttrs::named("Empty"))
        .unwrap();
    assert!(matches!(empty.max(), Err(ModelError::EmptyScale(_))));
    assert!(matches!(empty.min(), Err(ModelError::EmptyScale(_))));
}

#[test]
fn test_latest_vote_per_expert() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let rel = fx
        .store
        .create_relationship(NewRelationship::new(
            fx.scale,
            Edge::SystemSatisfies {
                satisfier: radar,
                satisfied: search,
            },
        ))
        .unwrap();
    assert!(fx.store.latest_votes(rel.id).is_empty());

    let alice = fx.store.on_account_created("alice").unwrap();
    fx.store
        .cast_vote(NewVote::new(rel.id, fx.none).by(alice.id).at(100))
        .unwrap();
    fx.store
        .cast_vote(NewVote::new(rel.id, fx.full).by(alice.id).at(300))
        .unwrap();
    fx.store
        .cast_vote(NewVote::new(rel.id, fx.half).by(alice.id).at(200))
        .unwrap();

    let latest = fx.store.latest_votes(rel.id);
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[&Some(alice.id)].value, fx.full);
    assert_eq!(fx.store.votes(rel.id).len(), 3);
}

#[test]
fn test_vote_from_foreign_scale_rejected() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let other = fx
        .store
        .add_scale(fx.project, ScaleAttrs::named("Criticality"))
        .unwrap();
    let high = fx.store.add_level(other.id, "High", 9.0).unwrap();
    let rel = fx
        .store
        .create_relationship(NewRelationship::new(
            fx.scale,
            Edge::SystemSatisfies {
                satisfier: radar,
                satisfied: search,
            },
        ))
        .unwrap();

    let err = fx.store.cast_vote(NewVote::new(rel.id, high.id)).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Model(ModelError::ScaleMismatch { .. })
    ));
    assert!(fx.store.votes(rel.id).is_empty());
}

#[test]
fn test_detect_target_shortfall() {
    let mut fx = Fixture::new();
    let detect = fx.function("Detect Target");
    let search = fx.function("Search");
    let track = fx.function("Track");
    let radar = fx.system("Radar");
    let sonar = fx.system("Sonar");

    fx.requires(detect, search);
    fx.requires(detect, track);
    let full = fx.full;
    let half = fx.half;
    fx.satisfies(radar, search, full);
    fx.satisfies(sonar, track, half);

    let mut scorer = Scorer::new(&fx.store, ScoringConfig::default());
    assert!(approx(scorer.satisfaction(search).unwrap(), 1.0));
    assert!(approx(scorer.satisfaction(track).unwrap(), 0.5));
    assert!(approx(scorer.shortfall(detect).unwrap(), 0.5));
    assert!(approx(scorer.satisfaction(detect).unwrap(), 0.5));
}

#[test]
fn test_scoring_is_idempotent() {
    let mut fx = Fixture::new();
    let detect = fx.function("Detect Target");
    let track = fx.function("Track");
    let sonar = fx.system("Sonar");
    fx.requires(detect, track);
    let half = fx.half;
    fx.satisfies(sonar, track, half);

    let config = ScoringConfig::default();
    let first = functional_shortfall(&fx.store, fx.project, &config).unwrap();
    let second = functional_shortfall(&fx.store, fx.project, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cycle_fails_only_affected_functions() {
    let mut fx = Fixture::new();
    let a = fx.function("A");
    let b = fx.function("B");
    let c = fx.function("C");
    let d = fx.function("D");
    let radar = fx.system("Radar");
    fx.requires(a, b);
    fx.requires(b, a);
    fx.requires(d, a);
    let full = fx.full;
    fx.satisfies(radar, c, full);

    let mut scorer = Scorer::new(&fx.store, ScoringConfig::default());
    assert!(matches!(
        scorer.satisfaction(a),
        Err(ModelError::CyclicRequirement { .. })
    ));
    // D is not on the cycle but depends on it
    assert!(matches!(
        scorer.satisfaction(d),
        Err(ModelError::CyclicRequirement { .. })
    ));
    assert!(matches!(
        scorer.shortfall(b),
        Err(ModelError::CyclicRequirement { .. })
    ));
    assert!(approx(scorer.satisfaction(c).unwrap(), 1.0));
}

#[test]
fn test_empty_architecture_scores_zero() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let full = fx.full;
    fx.satisfies(radar, search, full);

    let empty = fx
        .store
        .add_architecture(fx.project, NamedAttrs::named("Nothing"), vec![])
        .unwrap();
    let scores = functional_satisfaction(&fx.store, empty.id, &ScoringConfig::default()).unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[&search], Ok(0.0));

    let with_radar = fx
        .store
        .add_architecture(fx.project, NamedAttrs::named("Radar only"), vec![radar])
        .unwrap();
    let scores =
        functional_satisfaction(&fx.store, with_radar.id, &ScoringConfig::default()).unwrap();
    assert_eq!(scores[&search], Ok(1.0));
}

#[test]
fn test_incompatibility_is_symmetric() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let lidar = fx.system("Lidar");
    let full = fx.full;
    let r1 = fx.satisfies(radar, search, full);
    let r2 = fx.satisfies(lidar, search, full);

    fx.store.mark_incompatible(r2.id, r1.id).unwrap();
    assert_eq!(fx.store.incompatible_with(r1.id), vec![r2.id]);
    assert_eq!(fx.store.incompatible_with(r2.id), vec![r1.id]);

    // marking again from the other side is a no-op
    fx.store.mark_incompatible(r1.id, r2.id).unwrap();
    assert_eq!(fx.store.incompatible_with(r1.id).len(), 1);

    let both = fx
        .store
        .add_architecture(fx.project, NamedAttrs::named("Both"), vec![radar, lidar])
        .unwrap();
    assert_eq!(architecture_conflicts(&fx.store, both.id).unwrap().len(), 1);

    fx.store.unmark_incompatible(r1.id, r2.id).unwrap();
    assert!(fx.store.incompatible_with(r2.id).is_empty());
}

#[test]
fn test_incompatibility_requires_system_satisfies() {
    let mut fx = Fixture::new();
    let a = fx.function("A");
    let b = fx.function("B");
    let radar = fx.system("Radar");
    let full = fx.full;
    let req = fx.requires(a, b);
    let sat = fx.satisfies(radar, a, full);

    assert!(fx.store.mark_incompatible(req.id, sat.id).is_err());
    assert!(fx.store.mark_incompatible(sat.id, sat.id).is_err());
}

#[test]
fn test_delete_function_cascades() {
    let mut fx = Fixture::new();
    let detect = fx.function("Detect Target");
    let track = fx.function("Track");
    let sonar = fx.system("Sonar");
    let req = fx.requires(detect, track);
    let half = fx.half;
    let sat = fx.satisfies(sonar, track, half);

    fx.store.delete_function(track).unwrap();
    assert!(fx.store.relationship(req.id).is_none());
    assert!(fx.store.relationship(sat.id).is_none());
    assert!(fx.store.votes(sat.id).is_empty());
    assert!(fx.store.function_requires(detect).is_empty());
    assert!(fx.store.system_satisfies(sonar).is_empty());
}

#[test]
fn test_delete_satisfies_removes_dependent_requirements() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let power = fx.function("Supply Power");
    let radar = fx.system("Radar");
    let full = fx.full;
    let sat = fx.satisfies(radar, search, full);
    let dependent = fx.relate(
        Edge::SystemSatisfactionRequires {
            relationship: sat.id,
            required: power,
        },
        full,
    );
    assert_eq!(fx.store.satisfaction_requires(sat.id).len(), 1);

    fx.store.delete_relationship(sat.id).unwrap();
    assert!(fx.store.relationship(dependent.id).is_none());
    assert_eq!(fx.store.relationship_count(), 0);
}

#[test]
fn test_satisfaction_requires_must_hang_off_system_satisfies() {
    let mut fx = Fixture::new();
    let a = fx.function("A");
    let b = fx.function("B");
    let req = fx.requires(a, b);

    let err = fx
        .store
        .create_relationship(NewRelationship::new(
            fx.scale,
            Edge::SystemSatisfactionRequires {
                relationship: req.id,
                required: b,
            },
        ))
        .unwrap_err();
    assert!(matches!(err, StoreError::Model(ModelError::Validation(_))));
}

#[test]
fn test_cross_project_relationship_rejected() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let other = fx
        .store
        .create_project(NamedAttrs::named("Other"))
        .unwrap();
    let foreign = fx
        .store
        .add_system(other.id, NodeAttrs::named("Foreign"))
        .unwrap();

    let err = fx
        .store
        .create_relationship(NewRelationship::new(
            fx.scale,
            Edge::SystemSatisfies {
                satisfier: foreign.id,
                satisfied: search,
            },
        ))
        .unwrap_err();
    assert!(matches!(err, StoreError::Model(ModelError::Validation(_))));
}

#[test]
fn test_deleting_expert_anonymizes_votes() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let rel = fx
        .store
        .create_relationship(NewRelationship::new(
            fx.scale,
            Edge::SystemSatisfies {
                satisfier: radar,
                satisfied: search,
            },
        ))
        .unwrap();
    let bob = fx.store.on_account_created("bob").unwrap();
    fx.store
        .cast_vote(NewVote::new(rel.id, fx.half).by(bob.id))
        .unwrap();

    fx.store.delete_expert(bob.id).unwrap();
    let votes = fx.store.votes(rel.id);
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].expert, None);
}

#[test]
fn test_one_profile_per_account() {
    let mut store = MemoryStore::new();
    store.on_account_created("carol").unwrap();
    assert!(store.on_account_created("carol").is_err());
    assert_eq!(store.experts().len(), 1);
}

#[test]
fn test_level_in_use_cannot_be_removed() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let half = fx.half;
    fx.satisfies(radar, search, half);

    let err = fx.store.remove_level(fx.scale, fx.half).unwrap_err();
    assert!(matches!(err, StoreError::Model(ModelError::Validation(_))));
    fx.store.remove_level(fx.scale, fx.none).unwrap();
    assert_eq!(fx.store.scale(fx.scale).unwrap().levels.len(), 2);
}

#[test]
fn test_category_kind_enforced() {
    let mut fx = Fixture::new();
    let sensors = fx
        .store
        .add_category(
            fx.project,
            CategoryAttrs {
                name: "Sensors".into(),
                description: String::new(),
                parent: None,
                kind: CategoryKind::Systems,
            },
        )
        .unwrap();

    let mut attrs = NodeAttrs::named("Radar");
    attrs.categories = vec![sensors.id];
    assert!(fx.store.add_system(fx.project, attrs.clone()).is_ok());
    assert!(fx.store.add_function(fx.project, attrs).is_err());
}

#[test]
fn test_scenario_scoped_scoring() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let sonar = fx.system("Sonar");

    let open_ocean = fx
        .store
        .add_scenario(
            fx.project,
            ScenarioAttrs {
                name: "Open Ocean".into(),
                ..Default::default()
            },
        )
        .unwrap();
    let storm = fx
        .store
        .add_scenario(
            fx.project,
            ScenarioAttrs {
                name: "Storm".into(),
                parent: Some(open_ocean.id),
                ..Default::default()
            },
        )
        .unwrap();
    let littoral = fx
        .store
        .add_scenario(
            fx.project,
            ScenarioAttrs {
                name: "Littoral".into(),
                ..Default::default()
            },
        )
        .unwrap();

    let radar_rel = fx
        .store
        .create_relationship(
            NewRelationship::new(
                fx.scale,
                Edge::SystemSatisfies {
                    satisfier: radar,
                    satisfied: search,
                },
            )
            .in_scenario(open_ocean.id),
        )
        .unwrap();
    fx.store
        .cast_vote(NewVote::new(radar_rel.id, fx.full))
        .unwrap();
    let sonar_rel = fx
        .store
        .create_relationship(
            NewRelationship::new(
                fx.scale,
                Edge::SystemSatisfies {
                    satisfier: sonar,
                    satisfied: search,
                },
            )
            .in_scenario(littoral.id),
        )
        .unwrap();
    fx.store
        .cast_vote(NewVote::new(sonar_rel.id, fx.half))
        .unwrap();

    let config = ScoringConfig::default();
    let mut in_storm = Scorer::new(&fx.store, config.clone()).in_scenario(storm.id);
    assert!(approx(in_storm.satisfaction(search).unwrap(), 1.0));

    let mut in_littoral = Scorer::new(&fx.store, config.clone()).in_scenario(littoral.id);
    assert!(approx(in_littoral.satisfaction(search).unwrap(), 0.5));

    let mut everywhere = Scorer::new(&fx.store, config);
    assert!(approx(everywhere.satisfaction(search).unwrap(), 1.0));
}

#[test]
fn test_confidence_weighting_changes_edge_weight() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let rel = fx
        .store
        .create_relationship(NewRelationship::new(
            fx.scale,
            Edge::SystemSatisfies {
                satisfier: radar,
                satisfied: search,
            },
        ))
        .unwrap();
    let alice = fx.store.on_account_created("alice").unwrap();
    let bob = fx.store.on_account_created("bob").unwrap();
    fx.store
        .cast_vote(NewVote::new(rel.id, fx.full).by(alice.id))
        .unwrap();
    fx.store
        .cast_vote(
            NewVote::new(rel.id, fx.none)
                .by(bob.id)
                .with_confidence(Confidence::Low),
        )
        .unwrap();

    let mut flat = Scorer::new(&fx.store, ScoringConfig::default());
    assert!(approx(flat.satisfaction(search).unwrap(), 0.5));

    // (1.0 * 1.0 + 0.3 * 0.0) / 1.3
    let mut weighted = Scorer::new(&fx.store, ScoringConfig::confidence_weighted());
    assert!(approx(weighted.satisfaction(search).unwrap(), 1.0 / 1.3));
}

#[test]
fn test_outgoing_and_incoming_views() {
    let mut fx = Fixture::new();
    let detect = fx.function("Detect Target");
    let track = fx.function("Track");
    let rel = fx.requires(detect, track);

    assert_eq!(fx.store.function_requires(detect), vec![rel.clone()]);
    assert_eq!(
        fx.store.incoming(track, RelationshipKind::FunctionRequires),
        vec![rel]
    );
    assert!(fx.store.function_requires(track).is_empty());
}

#[test]
fn test_snapshot_round_trip() {
    let mut fx = Fixture::new();
    let detect = fx.function("Detect Target");
    let track = fx.function("Track");
    let sonar = fx.system("Sonar");
    let lidar = fx.system("Lidar");
    fx.requires(detect, track);
    let half = fx.half;
    let r1 = fx.satisfies(sonar, track, half);
    let r2 = fx.satisfies(lidar, track, half);
    fx.store.mark_incompatible(r1.id, r2.id).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("model.json");
    fx.store.save(&path).unwrap();

    let restored = MemoryStore::open(&path).unwrap();
    assert_eq!(restored.functions(fx.project), fx.store.functions(fx.project));
    assert_eq!(restored.function_requires(detect), fx.store.function_requires(detect));
    assert_eq!(restored.incompatible_with(r1.id), vec![r2.id]);
    assert_eq!(restored.vote_count(), fx.store.vote_count());

    let config = ScoringConfig::default();
    assert_eq!(
        functional_shortfall(&restored, fx.project, &config).unwrap(),
        functional_shortfall(&fx.store, fx.project, &config).unwrap()
    );
}

#[test]
fn test_delete_project_removes_everything() {
    let mut fx = Fixture::new();
    let detect = fx.function("Detect Target");
    let track = fx.function("Track");
    fx.requires(detect, track);

    fx.store.delete_project(fx.project).unwrap();
    assert!(fx.store.projects().is_empty());
    assert!(fx.store.functions(fx.project).is_empty());
    assert!(fx.store.scales(fx.project).is_empty());
    assert_eq!(fx.store.relationship_count(), 0);
    assert_eq!(fx.store.vote_count(), 0);
}

#[test]
fn test_satisfier_outside_architecture_does_not_change_score() {
    let mut fx = Fixture::new();
    let top = fx.function("Top");
    let power = fx.function("Power");
    let radar = fx.system("Radar");
    let generator = fx.system("Generator");
    let lidar = fx.system("Lidar");
    fx.requires(top, power);
    let half = fx.half;
    fx.satisfies(generator, power, half);

    let architecture = fx
        .store
        .add_architecture(fx.project, NamedAttrs::named("Baseline"), vec![radar, generator])
        .unwrap();
    let config = ScoringConfig::default();
    let before = functional_satisfaction(&fx.store, architecture.id, &config).unwrap();
    assert_eq!(before[&top], Ok(0.5));

    let full = fx.full;
    fx.satisfies(lidar, top, full);
    let after = functional_satisfaction(&fx.store, architecture.id, &config).unwrap();
    assert_eq!(after[&top], Ok(0.5));

    // with every system available the new satisfier counts, capped by the requirement
    let mut scorer = Scorer::new(&fx.store, config);
    assert!(approx(scorer.satisfaction(top).unwrap(), 0.5));
}

#[test]
fn test_system_requirement_discounts_its_satisfactions() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let power = fx.function("Power");
    let radar = fx.system("Radar");
    let generator = fx.system("Generator");
    let full = fx.full;
    fx.satisfies(radar, search, full);
    fx.relate(
        Edge::SystemRequires {
            requiring: radar,
            required: power,
        },
        full,
    );

    // nothing provides power, so radar delivers nothing
    let mut scorer = Scorer::new(&fx.store, ScoringConfig::default());
    assert!(approx(scorer.satisfaction(search).unwrap(), 0.0));

    drop(scorer);
    let half = fx.half;
    fx.satisfies(generator, power, half);
    let mut scorer = Scorer::new(&fx.store, ScoringConfig::default());
    // 1.0 * (1 - 1.0 * (1 - 0.5))
    assert!(approx(scorer.satisfaction(search).unwrap(), 0.5));
}

#[test]
fn test_satisfaction_requirement_discounts_only_that_satisfaction() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let track = fx.function("Track");
    let cooling = fx.function("Cooling");
    let radar = fx.system("Radar");
    let chiller = fx.system("Chiller");
    let full = fx.full;
    let by_radar = fx.satisfies(radar, search, full);
    fx.satisfies(radar, track, full);
    fx.relate(
        Edge::SystemSatisfactionRequires {
            relationship: by_radar.id,
            required: cooling,
        },
        full,
    );

    let mut scorer = Scorer::new(&fx.store, ScoringConfig::default());
    assert!(approx(scorer.satisfaction(search).unwrap(), 0.0));
    assert!(approx(scorer.satisfaction(track).unwrap(), 1.0));

    drop(scorer);
    let half = fx.half;
    fx.satisfies(chiller, cooling, half);
    let mut scorer = Scorer::new(&fx.store, ScoringConfig::default());
    assert!(approx(scorer.satisfaction(search).unwrap(), 0.5));
    assert!(approx(scorer.satisfaction(track).unwrap(), 1.0));
}

#[test]
fn test_function_satisfier_scales_by_its_own_satisfaction() {
    let mut fx = Fixture::new();
    let navigate = fx.function("Navigate");
    let dead_reckoning = fx.function("Dead Reckoning");
    let gyro = fx.system("Gyro");
    let log = fx.system("Speed Log");
    let half = fx.half;
    let full = fx.full;
    fx.relate(
        Edge::FunctionSatisfies {
            satisfier: dead_reckoning,
            satisfied: navigate,
        },
        half,
    );
    fx.satisfies(gyro, dead_reckoning, full);

    // 0.5 * satisfaction(Dead Reckoning) = 0.5 * 1.0
    let mut scorer = Scorer::new(&fx.store, ScoringConfig::default());
    assert!(approx(scorer.satisfaction(navigate).unwrap(), 0.5));

    drop(scorer);
    let without_gyro = fx
        .store
        .add_architecture(fx.project, NamedAttrs::named("No Gyro"), vec![log])
        .unwrap();
    let scores =
        functional_satisfaction(&fx.store, without_gyro.id, &ScoringConfig::default()).unwrap();
    assert_eq!(scores[&dead_reckoning], Ok(0.0));
    assert_eq!(scores[&navigate], Ok(0.0));
}

#[test]
fn test_unvoted_weight_fills_in_for_missing_votes() {
    let mut fx = Fixture::new();
    let detect = fx.function("Detect Target");
    let track = fx.function("Track");
    let sonar = fx.system("Sonar");
    fx.unvoted(Edge::FunctionRequires {
        requiring: detect,
        required: track,
    });
    fx.unvoted(Edge::SystemSatisfies {
        satisfier: sonar,
        satisfied: track,
    });

    // unvoted satisfiers earn nothing and unvoted requirements are skipped
    let mut strict = Scorer::new(&fx.store, ScoringConfig::default());
    assert!(approx(strict.satisfaction(track).unwrap(), 0.0));
    assert!(approx(strict.shortfall(detect).unwrap(), 0.0));
    assert!(approx(strict.satisfaction(detect).unwrap(), 0.0));

    let config = ScoringConfig {
        unvoted_weight: Some(0.5),
        ..ScoringConfig::default()
    };
    let mut lenient = Scorer::new(&fx.store, config);
    assert!(approx(lenient.satisfaction(track).unwrap(), 0.5));
    // 0.5 * (1 - 0.5)
    assert!(approx(lenient.shortfall(detect).unwrap(), 0.25));
    assert!(approx(lenient.satisfaction(detect).unwrap(), 0.75));
}

#[test]
fn test_normalized_requirement_weights() {
    let mut fx = Fixture::new();
    let detect = fx.function("Detect Target");
    let track = fx.function("Track");
    let sonar = fx.system("Sonar");
    let half = fx.half;
    fx.satisfies(sonar, track, half);

    let hoq = fx
        .store
        .add_scale(fx.project, ScaleAttrs::named("House of Quality"))
        .unwrap();
    let high = fx.store.add_level(hoq.id, "High", 9.0).unwrap();
    fx.store.add_level(hoq.id, "Low", 1.0).unwrap();
    let rel = fx
        .store
        .create_relationship(NewRelationship::new(
            hoq.id,
            Edge::FunctionRequires {
                requiring: detect,
                required: track,
            },
        ))
        .unwrap();
    fx.store.cast_vote(NewVote::new(rel.id, high.id)).unwrap();

    // raw: 9 * (1 - 0.5)
    let mut raw = Scorer::new(&fx.store, ScoringConfig::default());
    assert!(approx(raw.shortfall(detect).unwrap(), 4.5));
    assert!(approx(raw.satisfaction(detect).unwrap(), 0.0));

    let config = ScoringConfig {
        normalize_weights: true,
        ..ScoringConfig::default()
    };
    let mut normalized = Scorer::new(&fx.store, config);
    assert!(approx(normalized.shortfall(detect).unwrap(), 0.5));
    assert!(approx(normalized.satisfaction(detect).unwrap(), 0.5));
}

#[test]
fn test_scenario_parent_loop_terminates() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let open_ocean = fx.scenario("Open Ocean", None);
    let storm = fx.scenario("Storm", Some(open_ocean));
    let harbor = fx.scenario("Harbor", None);
    fx.store
        .update_scenario(
            open_ocean,
            ScenarioAttrs {
                name: "Open Ocean".into(),
                parent: Some(storm),
                ..Default::default()
            },
        )
        .unwrap();

    let rel = fx
        .store
        .create_relationship(
            NewRelationship::new(
                fx.scale,
                Edge::SystemSatisfies {
                    satisfier: radar,
                    satisfied: search,
                },
            )
            .in_scenario(open_ocean),
        )
        .unwrap();
    fx.store.cast_vote(NewVote::new(rel.id, fx.full)).unwrap();

    let mut in_storm = Scorer::new(&fx.store, ScoringConfig::default()).in_scenario(storm);
    assert!(approx(in_storm.satisfaction(search).unwrap(), 1.0));
    let mut in_harbor = Scorer::new(&fx.store, ScoringConfig::default()).in_scenario(harbor);
    assert!(approx(in_harbor.satisfaction(search).unwrap(), 0.0));
}

#[test]
fn test_architecture_scored_within_scenario() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let sonar = fx.system("Sonar");
    let storm = fx.scenario("Storm", None);
    let calm = fx.scenario("Calm", None);

    let rel = fx
        .store
        .create_relationship(
            NewRelationship::new(
                fx.scale,
                Edge::SystemSatisfies {
                    satisfier: radar,
                    satisfied: search,
                },
            )
            .in_scenario(storm),
        )
        .unwrap();
    fx.store.cast_vote(NewVote::new(rel.id, fx.full)).unwrap();
    let half = fx.half;
    fx.satisfies(sonar, search, half);

    let both = fx
        .store
        .add_architecture(fx.project, NamedAttrs::named("Both"), vec![radar, sonar])
        .unwrap();
    let config = ScoringConfig::default();
    let in_storm = functional_satisfaction_in(&fx.store, both.id, Some(storm), &config).unwrap();
    assert_eq!(in_storm[&search], Ok(1.0));
    let in_calm = functional_satisfaction_in(&fx.store, both.id, Some(calm), &config).unwrap();
    assert_eq!(in_calm[&search], Ok(0.5));

    assert!(matches!(
        functional_satisfaction_in(&fx.store, both.id, Some(ScenarioId::new()), &config),
        Err(ModelError::NotFound { entity: "scenario", .. })
    ));
}

#[test]
fn test_update_level_value_applies_to_existing_votes() {
    let mut fx = Fixture::new();
    let search = fx.function("Search");
    let radar = fx.system("Radar");
    let half = fx.half;
    fx.satisfies(radar, search, half);

    let level = fx
        .store
        .update_level(fx.scale, fx.half, "Mostly", 0.8)
        .unwrap();
    assert_eq!(level.id, fx.half);
    assert_eq!(fx.store.scale(fx.scale).unwrap().level(fx.half).unwrap().name, "Mostly");

    let mut scorer = Scorer::new(&fx.store, ScoringConfig::default());
    assert!(approx(scorer.satisfaction(search).unwrap(), 0.8));

    drop(scorer);
    assert!(matches!(
        fx.store.update_level(fx.scale, LevelId::new(), "Ghost", 0.1),
        Err(StoreError::Model(ModelError::NotFound { .. }))
    ));
}

#[test]
fn test_update_scale_attributes() {
    let mut fx = Fixture::new();
    let scale = fx
        .store
        .update_scale(
            fx.scale,
            ScaleAttrs {
                name: "Capability".into(),
                description: "How well a system performs a function".into(),
                criteria: "Performance at sea state 4".into(),
            },
        )
        .unwrap();
    assert_eq!(scale.name, "Capability");
    assert_eq!(scale.criteria, "Performance at sea state 4");
    assert_eq!(scale.levels.len(), 3);

    assert!(fx
        .store
        .update_scale(fx.scale, ScaleAttrs::named(" "))
        .is_err());
}

#[test]
fn test_update_category_keeps_kind() {
    let mut fx = Fixture::new();
    let sensors = fx
        .store
        .add_category(
            fx.project,
            CategoryAttrs {
                name: "Sensors".into(),
                description: String::new(),
                parent: None,
                kind: CategoryKind::Systems,
            },
        )
        .unwrap();
    let equipment = fx
        .store
        .add_category(
            fx.project,
            CategoryAttrs {
                name: "Equipment".into(),
                description: String::new(),
                parent: None,
                kind: CategoryKind::Both,
            },
        )
        .unwrap();

    let renamed = fx
        .store
        .update_category(
            sensors.id,
            CategoryAttrs {
                name: "Detection Sensors".into(),
                description: "Anything that detects".into(),
                parent: Some(equipment.id),
                kind: CategoryKind::Systems,
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Detection Sensors");
    assert_eq!(renamed.parent, Some(equipment.id));

    let rekind = fx.store.update_category(
        sensors.id,
        CategoryAttrs {
            name: "Detection Sensors".into(),
            description: String::new(),
            parent: None,
            kind: CategoryKind::Functions,
        },
    );
    assert!(matches!(
        rekind,
        Err(StoreError::Model(ModelError::Validation(_)))
    ));
    assert_eq!(
        fx.store.category(sensors.id).unwrap().kind,
        CategoryKind::Systems
    );
}

#[test]
fn test_update_goal_term_and_architecture() {
    let mut fx = Fixture::new();
    let radar = fx.system("Radar");
    let term = fx
        .store
        .add_term(fx.project, NamedAttrs::named("ASW"))
        .unwrap();
    let goal = fx
        .store
        .add_goal(
            fx.project,
            GoalAttrs {
                name: "Protect the fleet".into(),
                ..Default::default()
            },
        )
        .unwrap();

    let goal = fx
        .store
        .update_goal(
            goal.id,
            GoalAttrs {
                name: "Protect the convoy".into(),
                body: "Detect submarines before they close".into(),
                terms: vec![term.id],
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(goal.name, "Protect the convoy");
    assert_eq!(goal.terms, vec![term.id]);
    assert!(fx
        .store
        .update_goal(
            goal.id,
            GoalAttrs {
                name: "Protect the convoy".into(),
                terms: vec![sysarch_domain::TermId::new()],
                ..Default::default()
            },
        )
        .is_err());

    let term = fx
        .store
        .update_term(
            term.id,
            NamedAttrs::named("ASW").with_description("Anti-submarine warfare"),
        )
        .unwrap();
    assert_eq!(fx.store.glossary(fx.project), vec![term]);

    let architecture = fx
        .store
        .add_architecture(fx.project, NamedAttrs::named("Draft"), vec![radar])
        .unwrap();
    let architecture = fx
        .store
        .update_architecture(architecture.id, NamedAttrs::named("Radar Picket"))
        .unwrap();
    assert_eq!(architecture.name, "Radar Picket");
    assert_eq!(architecture.systems, vec![radar]);
}

#[test]
fn test_delete_organization_clears_affiliations() {
    let mut fx = Fixture::new();
    let navy = fx
        .store
        .add_organization(NamedAttrs::named("Navy"))
        .unwrap();
    let navy = fx
        .store
        .update_organization(navy.id, NamedAttrs::named("US Navy"))
        .unwrap();
    assert_eq!(fx.store.organizations(), vec![navy.clone()]);

    let mut alice = fx.store.on_account_created("alice").unwrap();
    alice.organization = Some(navy.id);
    fx.store.update_expert(alice.clone()).unwrap();

    fx.store.delete_organization(navy.id).unwrap();
    assert!(fx.store.organizations().is_empty());
    assert_eq!(fx.store.expert(alice.id).unwrap().organization, None);
    assert!(fx.store.delete_organization(navy.id).is_err());
}

#[test]
fn test_store_failures_split_from_model_errors() {
    let missing = StoreError::Model(ModelError::not_found("function", "abc"));
    assert!(matches!(
        MemoryStore::into_model_error(missing),
        Ok(ModelError::NotFound { .. })
    ));

    let io = StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
    assert!(matches!(
        MemoryStore::into_model_error(io),
        Err(StoreError::Io(_))
    ));
}
