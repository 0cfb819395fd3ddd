pub mod d400_item_segmentation;
