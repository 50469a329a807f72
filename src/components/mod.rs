pub mod shot_map;
