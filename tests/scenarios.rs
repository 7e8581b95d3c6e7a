use avl_set::AvlTree;

fn in_order<T: Copy>(tree: &AvlTree<T>) -> Vec<T> {
    let mut values = Vec::new();
    tree.traverse_in_order(|value| values.push(*value));
    values
}

#[test]
fn characters_in_order() {
    let tree = AvlTree::from(['a', 'b', 'c', 'd']);
    assert_eq!(in_order(&tree), ['a', 'b', 'c', 'd']);
    assert_eq!(tree.to_string(), "a b c d");
}

#[test]
fn erase_last_character() {
    let mut tree = AvlTree::from(['a', 'b', 'c', 'd']);
    tree.remove(&'d');
    assert_eq!(in_order(&tree), ['a', 'b', 'c']);
    assert_eq!(tree.len(), 3);
    assert!(!tree.contains(&'d'));
    assert!(tree.contains(&'a'));
}

#[test]
fn ascending_inserts_stay_balanced() {
    let mut tree = AvlTree::new();
    for value in 1..=7 {
        tree.insert(value);
    }
    assert!(tree.height() <= 3);
    assert_eq!(in_order(&tree), [1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn erase_node_with_two_children() {
    let mut tree = AvlTree::from([5, 3, 8]);
    assert_eq!(tree.take(&5), Some(5));
    assert_eq!(in_order(&tree), [3, 8]);
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.first(), Some(&3));
    assert_eq!(tree.last(), Some(&8));
}

#[test]
fn double_rotation_keeps_height() {
    let tree = AvlTree::from([30, 10, 20]);
    assert_eq!(tree.height(), 2);
    assert_eq!(in_order(&tree), [10, 20, 30]);

    let tree = AvlTree::from([10, 30, 20]);
    assert_eq!(tree.height(), 2);
    assert_eq!(in_order(&tree), [10, 20, 30]);
}

#[test]
fn no_op_edits() {
    let mut tree = AvlTree::from([2, 4, 6]);
    assert!(!tree.insert(4));
    assert!(!tree.remove(&5));
    assert_eq!(tree.take(&7), None);
    assert_eq!(tree.len(), 3);
    assert_eq!(in_order(&tree), [2, 4, 6]);
}

#[test]
fn copy_is_independent() {
    let original = AvlTree::from([1, 2, 3, 4, 5]);
    let mut copy = original.clone();
    copy.remove(&3);
    copy.insert(9);
    assert_eq!(in_order(&original), [1, 2, 3, 4, 5]);
    assert_eq!(in_order(&copy), [1, 2, 4, 5, 9]);
}

#[test]
fn move_leaves_source_empty() {
    let mut source = AvlTree::from([1, 2, 3]);
    let target = std::mem::take(&mut source);
    assert!(source.is_empty());
    assert_eq!(source.height(), 0);
    assert_eq!(target.len(), 3);
}
