use crate::engine::DrawingContext;
use crate::geometry::Point;
use crate::object::{Entity, Hooked, Hooks};

type Layer = Vec<(String, Entity)>;

/// ┌──────────────────────────── Ui ─────────────────────────────┐
/// │  layer   clickable            unclickable                   │
/// │  0       ok_button            message_text      ◄ top       │
/// │  1                            message_box                   │
/// │  2                            overlay                       │
/// │  ...                                                        │
/// │  N-1                          logo_lander       ◄ bottom    │
/// ├─────────────────────────────────────────────────────────────┤
/// │  update : 0 → N-1      draw : N-1 → 0                       │
/// │  within a layer : clickable first, then insertion order     │
/// └─────────────────────────────────────────────────────────────┘
#[derive(Default)]
pub struct Ui {
    clickable: Vec<Layer>,
    unclickable: Vec<Layer>,
    hooks: Hooks<Ui>,
}

impl Hooked for Ui {
    fn hooks(&self) -> &Hooks<Self> {
        &self.hooks
    }

    fn hooks_mut(&mut self) -> &mut Hooks<Self> {
        &mut self.hooks
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    clickable: bool,
    layer: usize,
    index: usize,
}

impl Ui {
    pub fn on_update(&mut self, hook: impl FnMut(&mut Ui, f64) + 'static) {
        self.hooks.on_update = Some(Box::new(hook));
    }

    pub fn on_draw(&mut self, hook: impl Fn(&Ui, &dyn DrawingContext) + 'static) {
        self.hooks.on_draw = Some(Box::new(hook));
    }

    /// Adds `entity` under `name`. An existing entity with the same name in
    /// the same layer and group is replaced in place.
    pub fn add_object(
        &mut self,
        layer: usize,
        clickable: bool,
        name: &str,
        entity: impl Into<Entity>,
    ) -> &mut Entity {
        let group = if clickable {
            &mut self.clickable
        } else {
            &mut self.unclickable
        };
        if group.len() <= layer {
            group.resize_with(layer + 1, Vec::new);
        }
        let objects = &mut group[layer];
        let entity = entity.into();
        let index = match objects.iter().position(|(existing, _)| existing == name) {
            Some(index) => {
                objects[index].1 = entity;
                index
            }
            None => {
                objects.push((name.to_string(), entity));
                objects.len() - 1
            }
        };
        &mut objects[index].1
    }

    fn layers(&self) -> usize {
        self.clickable.len().max(self.unclickable.len())
    }

    fn locate(&self, name: &str, clickable: Option<bool>, from_layer: usize) -> Option<Slot> {
        let search = |group: &[Layer], is_clickable: bool, layer: usize| {
            group.get(layer).and_then(|objects| {
                objects
                    .iter()
                    .position(|(existing, _)| existing == name)
                    .map(|index| Slot {
                        clickable: is_clickable,
                        layer,
                        index,
                    })
            })
        };

        (from_layer..self.layers()).find_map(|layer| {
            let in_clickable = if clickable != Some(false) {
                search(&self.clickable, true, layer)
            } else {
                None
            };
            in_clickable.or_else(|| {
                if clickable != Some(true) {
                    search(&self.unclickable, false, layer)
                } else {
                    None
                }
            })
        })
    }

    fn group_mut(&mut self, clickable: bool) -> &mut Vec<Layer> {
        if clickable {
            &mut self.clickable
        } else {
            &mut self.unclickable
        }
    }

    /// First entity called `name`, searching from `from_layer` upwards.
    /// `clickable` restricts the search to one group.
    pub fn get_object(
        &self,
        name: &str,
        clickable: Option<bool>,
        from_layer: usize,
    ) -> Option<&Entity> {
        let slot = self.locate(name, clickable, from_layer)?;
        let group = if slot.clickable {
            &self.clickable
        } else {
            &self.unclickable
        };
        group
            .get(slot.layer)
            .and_then(|objects| objects.get(slot.index))
            .map(|(_, entity)| entity)
    }

    pub fn get_object_mut(
        &mut self,
        name: &str,
        clickable: Option<bool>,
        from_layer: usize,
    ) -> Option<&mut Entity> {
        let slot = self.locate(name, clickable, from_layer)?;
        self.group_mut(slot.clickable)
            .get_mut(slot.layer)
            .and_then(|objects| objects.get_mut(slot.index))
            .map(|(_, entity)| entity)
    }

    /// Removes the first match, as found by [`Ui::get_object`]
    pub fn remove_object(&mut self, name: &str, clickable: Option<bool>, from_layer: usize) -> bool {
        match self.locate(name, clickable, from_layer) {
            Some(slot) => {
                if let Some(objects) = self.group_mut(slot.clickable).get_mut(slot.layer) {
                    objects.remove(slot.index);
                }
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_object(name, None, 0).is_some()
    }

    pub fn len(&self) -> usize {
        self.clickable
            .iter()
            .chain(self.unclickable.iter())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn update(&mut self, dt: f64) {
        self.run_update_hook(dt);
        for layer in 0..self.layers() {
            for group in [&mut self.clickable, &mut self.unclickable] {
                if let Some(objects) = group.get_mut(layer) {
                    for (_, entity) in objects.iter_mut() {
                        entity.update(dt);
                    }
                }
            }
        }
    }

    pub fn draw(&self, context: &dyn DrawingContext) {
        self.run_draw_hook(context);
        for layer in (0..self.layers()).rev() {
            for group in [&self.clickable, &self.unclickable] {
                if let Some(objects) = group.get(layer) {
                    for (_, entity) in objects {
                        entity.draw(context);
                    }
                }
            }
        }
    }

    /// First clickable entity under `point`, top layer first
    pub fn check_collision_with_point(&mut self, point: Point) -> Option<&mut Entity> {
        self.clickable
            .iter_mut()
            .flat_map(|objects| objects.iter_mut())
            .map(|(_, entity)| entity)
            .find(|entity| entity.collision_with_point(point))
    }
}
