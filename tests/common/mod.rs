use blops_lib::model::config::PhysicsConfig;
use blops_lib::model::{Blop, Bounds, RelationModel, Simulation, SpeciesId};

#[allow(dead_code)]
pub struct SimulationBuilder {
    blops: Vec<Blop>,
    relations: Vec<Vec<f64>>,
    physics: PhysicsConfig,
    bounds: Bounds,
    seed: Option<u64>,
}

#[allow(dead_code)]
impl SimulationBuilder {
    /// Two species, neutral relations, 1000×1000 world.
    pub fn new() -> Self {
        Self {
            blops: Vec::new(),
            relations: vec![vec![0.0, 0.0], vec![0.0, 0.0]],
            physics: PhysicsConfig::default(),
            bounds: Bounds::new(1000.0, 1000.0),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_relations(mut self, rows: Vec<Vec<f64>>) -> Self {
        self.relations = rows;
        self
    }

    /// Same relation between every pair of species, including self.
    pub fn with_uniform_relation(mut self, relation: f64) -> Self {
        let n = self.relations.len();
        self.relations = vec![vec![relation; n]; n];
        self
    }

    pub fn with_bounds(mut self, width: f64, height: f64) -> Self {
        self.bounds = Bounds::new(width, height);
        self
    }

    pub fn with_physics<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut PhysicsConfig),
    {
        modifier(&mut self.physics);
        self
    }

    pub fn without_noise(self) -> Self {
        self.with_physics(|p| p.noise_amplitude = 0.0)
    }

    pub fn with_blop(mut self, x: f64, y: f64, species: u16) -> Self {
        self.blops.push(Blop::new(x, y, SpeciesId(species)));
        self
    }

    pub fn with_moving_blop(mut self, x: f64, y: f64, vx: f64, vy: f64, species: u16) -> Self {
        self.blops
            .push(Blop::new(x, y, SpeciesId(species)).with_velocity(vx, vy));
        self
    }

    pub fn with_blops(mut self, blops: Vec<Blop>) -> Self {
        self.blops.extend(blops);
        self
    }

    pub fn build(self) -> Simulation {
        let relations = RelationModel::new(&self.relations).expect("test relations are valid");
        Simulation::with_blops(self.blops, relations, self.physics, self.bounds, self.seed)
            .expect("test scenario is valid")
    }
}

#[allow(dead_code)]
pub fn separation(sim: &Simulation, a: usize, b: usize) -> f64 {
    let blops = sim.blops();
    blops[a].position.distance(&blops[b].position)
}
